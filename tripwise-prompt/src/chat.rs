use async_trait::async_trait;
use tripwise_core::{Message, Runnable, TripwiseError};

use crate::{PromptTemplate, PromptVars};

#[derive(Debug, Clone)]
pub enum MessagePromptTemplate {
    System(PromptTemplate),
    Human(PromptTemplate),
    Ai(PromptTemplate),
}

impl MessagePromptTemplate {
    pub fn system(template: &str) -> Self {
        Self::System(PromptTemplate::new(template))
    }

    pub fn human(template: &str) -> Self {
        Self::Human(PromptTemplate::new(template))
    }

    pub fn ai(template: &str) -> Self {
        Self::Ai(PromptTemplate::new(template))
    }

    pub fn format(&self, vars: &PromptVars) -> Result<Message, TripwiseError> {
        Ok(match self {
            MessagePromptTemplate::System(t) => Message::system(t.render(vars)?),
            MessagePromptTemplate::Human(t) => Message::user(t.render(vars)?),
            MessagePromptTemplate::Ai(t) => Message::assistant(t.render(vars)?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ChatPromptTemplate {
    messages: Vec<MessagePromptTemplate>,
}

impl ChatPromptTemplate {
    pub fn new(messages: Vec<MessagePromptTemplate>) -> Self {
        Self { messages }
    }

    pub fn format_messages(&self, vars: &PromptVars) -> Result<Vec<Message>, TripwiseError> {
        self.messages.iter().map(|tmpl| tmpl.format(vars)).collect()
    }
}

#[async_trait]
impl Runnable<PromptVars, Vec<Message>> for ChatPromptTemplate {
    async fn invoke(&self, input: PromptVars) -> Result<Vec<Message>, TripwiseError> {
        self.format_messages(&input)
    }
}
