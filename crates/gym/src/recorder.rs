//! # Rollouts
//!
//! Records whole episodes as plain data, so that a run can be stored as a
//! JSON fixture and compared against later runs within a tolerance.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ArrayRecord, BoxSpace, Domain, Environment, GymError, Info};

/// One row of a rollout: the state reached, and how it was reached.
///
/// The first transition of an episode comes from `reset` and carries no
/// action, reward or flags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub dae_state: Vec<f64>,
    pub observation: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
    #[serde(default)]
    pub info: Info,
}

impl Transition {
    /// Numbers compare with `|a - b| <= atol + rtol * |b|`; everything else
    /// must match exactly.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, rtol: f64, atol: f64) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= atol + rtol * b.abs();
        let close_slices = |a: &[f64], b: &[f64]| {
            a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| close(x, y))
        };

        close_slices(&self.dae_state, &other.dae_state)
            && close_slices(&self.observation, &other.observation)
            && match (&self.action, &other.action) {
                (Some(a), Some(b)) => close_slices(a, b),
                (None, None) => true,
                _ => false,
            }
            && match (self.reward, other.reward) {
                (Some(a), Some(b)) => close(a, b),
                (None, None) => true,
                _ => false,
            }
            && self.terminated == other.terminated
            && self.truncated == other.truncated
            && self.info.len() == other.info.len()
            && self.info.iter().all(|(key, value)| {
                other
                    .info
                    .get(key)
                    .is_some_and(|theirs| values_close(value, theirs, rtol, atol))
            })
    }
}

fn values_close(a: &Value, b: &Value, rtol: f64, atol: f64) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => (x - y).abs() <= atol + rtol * y.abs(),
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys)
                    .all(|(x, y)| values_close(x, y, rtol, atol))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs.iter().all(|(key, x)| {
                    ys.get(key)
                        .is_some_and(|y| values_close(x, y, rtol, atol))
                })
        }
        _ => a == b,
    }
}

/// Sink for transitions.
pub trait Recorder {
    fn record(&mut self, transition: Transition);
    fn transitions(&self) -> &[Transition];
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rollout {
    transitions: Vec<Transition>,
}

impl Recorder for Rollout {
    fn record(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    fn transitions(&self) -> &[Transition] {
        &self.transitions
    }
}

impl Rollout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns [`GymError::Json`] on malformed input.
    pub fn from_json(json: &str) -> Result<Self, GymError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns [`GymError::Json`] when a value cannot be serialised.
    pub fn to_json(&self) -> Result<String, GymError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Episode return: the sum of all recorded rewards.
    pub fn total_reward(&self) -> f64 {
        self.transitions.iter().filter_map(|t| t.reward).sum()
    }

    /// Same length, and every pair of transitions is
    /// [`approx_eq`](Transition::approx_eq).
    #[must_use]
    pub fn approx_eq(&self, other: &Self, rtol: f64, atol: f64) -> bool {
        self.transitions.len() == other.transitions.len()
            && self
                .transitions
                .iter()
                .zip(&other.transitions)
                .all(|(a, b)| a.approx_eq(b, rtol, atol))
    }
}

/// Resets `env` and steps it with `policy` until the episode ends or
/// `max_steps` actions have been taken.
///
/// `policy` receives the latest observation and the action space, and
/// returns the raw action to apply.
///
/// # Errors
///
/// Forwards any error of `reset` or `step`.
pub fn record_episode<D, P>(
    env: &mut Environment<D>,
    seed: Option<u64>,
    max_steps: Option<usize>,
    mut policy: P,
) -> Result<Rollout, GymError>
where
    D: Domain,
    P: FnMut(&[f64], &BoxSpace) -> Vec<f64>,
{
    let mut rollout = Rollout::new();
    let (mut observation, info) = env.reset(seed, None)?;
    rollout.record(Transition {
        dae_state: env.state().dae_state().to_array(),
        observation: observation.clone(),
        action: None,
        reward: None,
        terminated: None,
        truncated: None,
        info,
    });

    let mut steps = 0;
    while max_steps.map_or(true, |max| steps < max) {
        let action = policy(&observation, env.action_space());
        let result = env.step(&action)?;
        steps += 1;
        let done = result.is_done();
        rollout.record(Transition {
            dae_state: env.state().dae_state().to_array(),
            observation: result.observation.clone(),
            action: Some(action),
            reward: Some(result.reward),
            terminated: Some(result.terminated),
            truncated: Some(result.truncated),
            info: result.info,
        });
        observation = result.observation;
        if done {
            break;
        }
    }
    Ok(rollout)
}
