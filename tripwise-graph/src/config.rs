#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// Upper bound on node executions for one run, counted across resumes.
    pub max_steps: Option<usize>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_steps: Some(50),
        }
    }
}

impl ExecutionConfig {
    pub fn with_max_steps(max_steps: usize) -> Self {
        Self {
            max_steps: Some(max_steps),
        }
    }

    pub fn unbounded() -> Self {
        Self { max_steps: None }
    }
}
