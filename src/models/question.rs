// src/models/question.rs

use serde::Serialize;

/// Number of questions in an assessment attempt.
pub const QUESTION_COUNT: usize = 5;

/// A multiple-choice question. The bank is fixed at compile time; questions
/// are never created or edited at runtime.
#[derive(Debug, Clone, Copy)]
pub struct Question {
    pub id: u32,
    pub prompt: &'static str,
    pub options: [&'static str; 4],
    pub correct: usize,
}

/// DTO for sending a question to the client (excludes the correct index).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: u32,
    pub question: &'static str,
    pub options: [&'static str; 4],
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            question: q.prompt,
            options: q.options,
        }
    }
}

pub const QUESTION_BANK: [Question; QUESTION_COUNT] = [
    Question {
        id: 1,
        prompt: "What is React?",
        options: ["A JavaScript library", "A database", "A server", "An OS"],
        correct: 0,
    },
    Question {
        id: 2,
        prompt: "What is JSX?",
        options: [
            "JavaScript XML",
            "Java Syntax",
            "JSON Extended",
            "JavaScript eXtended",
        ],
        correct: 0,
    },
    Question {
        id: 3,
        prompt: "What is a React Hook?",
        options: ["A function", "A class", "A component", "A library"],
        correct: 0,
    },
    Question {
        id: 4,
        prompt: "What is useState used for?",
        options: ["State management", "Routing", "API calls", "Styling"],
        correct: 0,
    },
    Question {
        id: 5,
        prompt: "What is the virtual DOM?",
        options: [
            "A JavaScript representation of DOM",
            "A real DOM",
            "A database",
            "A server",
        ],
        correct: 0,
    },
];
