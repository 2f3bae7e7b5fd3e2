// src/chat.rs

use std::time::Duration;

use chrono::Utc;
use rand::{Rng, seq::SliceRandom};
use tokio_util::sync::CancellationToken;

use crate::{
    error::AppError,
    models::chat::ChatMessage,
    store::{Store, keys},
};

pub const AGENT_NAME: &str = "Support Agent";

/// Canned replies sent ~1s after a user message.
const REPLIES: [&str; 4] = [
    "Thank you for your message! I'll help you with that.",
    "That's a great question. Let me provide you with some information.",
    "I understand your concern. Here's what I can suggest.",
    "Thanks for reaching out! I'm here to assist you.",
];

/// Unprompted greetings dropped into the transcript by the simulator.
const GREETINGS: [&str; 4] = [
    "Hello! How can I help you today?",
    "Is there anything specific you need assistance with?",
    "Feel free to ask any questions!",
    "Our support team is here to help 24/7",
];

const REPLY_DELAY: Duration = Duration::from_secs(1);
const SIMULATOR_INTERVAL: Duration = Duration::from_secs(15);
const SIMULATOR_CHANCE: f64 = 0.3;

/// Appends one message to the transcript and returns it.
pub async fn append_message(
    store: &Store,
    sender: &str,
    message: &str,
    is_bot: bool,
) -> Result<ChatMessage, AppError> {
    let entry = ChatMessage {
        id: Utc::now().timestamp_millis(),
        sender: sender.to_string(),
        message: message.to_string(),
        timestamp: Utc::now(),
        is_bot,
    };

    // Appends from handlers, bot replies, and the simulator race freely;
    // the cycle lock keeps each append from losing another's write.
    let _cycle = store.lock_updates().await;
    let mut transcript: Vec<ChatMessage> =
        store.get(keys::CHAT_MESSAGES).await?.unwrap_or_default();
    transcript.push(entry.clone());
    store.set(keys::CHAT_MESSAGES, &transcript).await?;

    Ok(entry)
}

pub async fn transcript(store: &Store) -> Result<Vec<ChatMessage>, AppError> {
    Ok(store.get(keys::CHAT_MESSAGES).await?.unwrap_or_default())
}

/// Schedules the canned agent reply to a user message. The task is tied to
/// the shutdown token so no timer fires after teardown.
pub fn spawn_bot_reply(store: Store, cancel: CancellationToken) {
    let reply = *REPLIES.choose(&mut rand::thread_rng()).unwrap_or(&REPLIES[0]);

    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(REPLY_DELAY) => {
                if let Err(e) = append_message(&store, AGENT_NAME, reply, true).await {
                    tracing::warn!("Failed to append bot reply: {}", e);
                }
            }
        }
    });
}

/// Background chat simulator: every 15 seconds there is a 30% chance the
/// agent drops a greeting into the transcript. Runs until shutdown.
pub fn spawn_simulator(store: Store, cancel: CancellationToken) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SIMULATOR_INTERVAL);
        ticker.tick().await; // the first tick completes immediately

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let greeting = {
                        let mut rng = rand::thread_rng();
                        if !rng.gen_bool(SIMULATOR_CHANCE) {
                            continue;
                        }
                        *GREETINGS.choose(&mut rng).unwrap_or(&GREETINGS[0])
                    };

                    if let Err(e) = append_message(&store, AGENT_NAME, greeting, true).await {
                        tracing::warn!("Chat simulator write failed: {}", e);
                    }
                }
            }
        }
        tracing::debug!("Chat simulator stopped");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn appended_messages_accumulate_in_order() {
        let store = Store::in_memory();
        append_message(&store, "Alice", "hi", false).await.unwrap();
        append_message(&store, AGENT_NAME, "hello", true).await.unwrap();

        let transcript = transcript(&store).await.unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].sender, "Alice");
        assert!(transcript[1].is_bot);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_lose_no_messages() {
        use std::sync::Arc;

        let store = Store::in_memory();
        let barrier = Arc::new(tokio::sync::Barrier::new(16));

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            let barrier = barrier.clone();
            handles.push(tokio::spawn(async move {
                barrier.wait().await;
                append_message(&store, "Alice", &format!("message {}", i), false)
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(transcript(&store).await.unwrap().len(), 16);
    }

    #[tokio::test(start_paused = true)]
    async fn bot_reply_lands_after_the_delay() {
        let store = Store::in_memory();
        let cancel = CancellationToken::new();

        spawn_bot_reply(store.clone(), cancel);
        tokio::time::sleep(Duration::from_secs(2)).await;

        let transcript = transcript(&store).await.unwrap();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].sender, AGENT_NAME);
        assert!(REPLIES.contains(&transcript[0].message.as_str()));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_reply_never_fires() {
        let store = Store::in_memory();
        let cancel = CancellationToken::new();

        spawn_bot_reply(store.clone(), cancel.clone());
        cancel.cancel();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(transcript(&store).await.unwrap().is_empty());
    }
}
