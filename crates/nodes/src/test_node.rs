//! `TestNode` — a programmable [`ActionHandler`] double for tests.
//!
//! Lets tests assert on call count and inject a specific success value, a
//! retryable/permanent failure, or a failure that clears after a fixed
//! number of attempts — without depending on a real action.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{ActionHandler, HandlerError, NodeContext};

pub enum Behaviour {
    Return(Value),
    FailRetryable(String),
    FailPermanent(String),
    /// Fail retryably on the first `attempts_to_fail` calls, then succeed.
    FailThenReturn { attempts_to_fail: usize, then: Value },
}

pub struct TestNode {
    pub name: String,
    pub behaviour: Behaviour,
    pub calls: Arc<Mutex<Vec<Value>>>,
}

impl TestNode {
    pub fn returning(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            behaviour: Behaviour::Return(value),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_retryable(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behaviour: Behaviour::FailRetryable(msg.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_permanent(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behaviour: Behaviour::FailPermanent(msg.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_then_returning(
        name: impl Into<String>,
        attempts_to_fail: usize,
        then: Value,
    ) -> Self {
        Self {
            name: name.into(),
            behaviour: Behaviour::FailThenReturn {
                attempts_to_fail,
                then,
            },
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ActionHandler for TestNode {
    async fn call(&self, _node: &NodeContext, input: &Value) -> Result<Value, HandlerError> {
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(input.clone());
            calls.len()
        };

        match &self.behaviour {
            Behaviour::Return(v) => Ok(json!({ "node": self.name, "value": v })),
            Behaviour::FailRetryable(msg) => Err(HandlerError::Retryable(msg.clone())),
            Behaviour::FailPermanent(msg) => Err(HandlerError::Permanent(msg.clone())),
            Behaviour::FailThenReturn {
                attempts_to_fail,
                then,
            } => {
                if attempt <= *attempts_to_fail {
                    Err(HandlerError::Retryable(format!(
                        "attempt {attempt} of {attempts_to_fail} fails"
                    )))
                } else {
                    Ok(then.clone())
                }
            }
        }
    }
}
