//! Policy port - the capability shared by every agent variant
//!
//! Evaluation harnesses hold a `Box<dyn Policy>` and never need to know
//! whether actions come from a Q-table or a network.

use crate::{
    Result,
    types::{Action, Observation},
};

/// Maps observations to actions.
///
/// Implemented by [`crate::q_learning::QLearningAgent`] and
/// [`crate::network::NetworkAgent`]. The variant is chosen by
/// [`crate::app::AgentKind`] in static configuration.
///
/// # Examples
///
/// ```
/// use flapq::{
///     ports::Policy,
///     q_learning::{QLearningAgent, QLearningParams},
///     types::Observation,
/// };
///
/// fn play_step(policy: &mut dyn Policy, obs: &Observation) -> flapq::Result<()> {
///     let _action = policy.act(obs)?;
///     Ok(())
/// }
///
/// let mut agent = QLearningAgent::new(QLearningParams::default())?;
/// play_step(&mut agent, &Observation::default())?;
/// # Ok::<(), flapq::Error>(())
/// ```
pub trait Policy: Send {
    /// Choose an action for the current observation.
    fn act(&mut self, observation: &Observation) -> Result<Action>;

    /// Called before every episode.
    ///
    /// Learned state must survive this call; it only clears per-episode
    /// state. The default does nothing.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    /// Name used in logs.
    fn name(&self) -> &str;
}
