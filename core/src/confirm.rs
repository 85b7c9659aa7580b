//! Operator confirmation before the irreversible step.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// The only answer that lets a migration proceed.
pub const CONFIRMATION_WORD: &str = "yes";

/// Presents a prompt and returns whatever the operator answered.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn ask(&self, prompt: &str) -> io::Result<String>;
}

/// True only for an exact, case-sensitive `yes`. The trailing line
/// terminator is ignored; any other whitespace is not.
pub fn is_confirmed(answer: &str) -> bool {
    answer.trim_end_matches(['\r', '\n']) == CONFIRMATION_WORD
}

/// Prompts on stdout and blocks on one line of stdin, without a timeout.
#[derive(Debug, Default)]
pub struct StdinConfirmer;

#[async_trait]
impl Confirmer for StdinConfirmer {
    async fn ask(&self, prompt: &str) -> io::Result<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let mut line = String::new();
        // EOF leaves the line empty, which reads as a decline.
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await?;
        Ok(line)
    }
}

/// Answers from a fixed script and records every prompt it was shown.
/// Runs out of answers as an empty reply.
#[derive(Debug, Default)]
pub struct ScriptedConfirmer {
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmer {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn ask(&self, prompt: &str) -> io::Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let answer = self
            .answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .unwrap_or_default();
        Ok(answer)
    }
}
