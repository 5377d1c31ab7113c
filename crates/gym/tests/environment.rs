//! Step and reset behaviour of the orchestrator, driven by a toy tank model
//! whose collaborators log every call.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use approx::assert_relative_eq;
use gym::record::integral_field;
use gym::{
    record_episode, ActionConverter, ActionPipeline, ActionRegulator, ArrayRecord, BoxSpace,
    Domain, Env, Environment, EnvironmentBuilder, FixedDurationTimeSpan, GymError, Info,
    InfoExtractor, InitialStateGenerator, Observation, ObservationExtractor, ParameterAdvance,
    ParameterSampler, ParametersGeneratorConfig, PhysicalParametersGenerator, Recorder,
    RewardExtractor, SamplingRegistry, State, StateOf, StatePostprocessor, StatePreprocessor,
    TerminatedExtractor, TimeSpanCalculator, TruncatedExtractor,
};
use rand::RngCore;
use serde_json::json;
use solver::{Integrator, SolverError, TimeSpan};

type Log = Rc<RefCell<Vec<&'static str>>>;

struct Tank;

#[derive(Clone, Debug, PartialEq)]
struct Level {
    level: f64,
}

#[derive(Clone, Debug, PartialEq)]
struct Outflow {
    outflow: f64,
}

#[derive(Clone, Debug, PartialEq)]
struct Ticks {
    tick: u32,
    limit: u32,
}

#[derive(Clone, Debug, PartialEq)]
struct Valve {
    opening: f64,
}

#[derive(Clone, Debug, PartialEq)]
struct Inflow {
    inflow: f64,
}

struct Gauge(f64);

#[derive(Clone, Debug)]
struct TankParameters {
    outflow: f64,
    limit: u32,
}

macro_rules! scalar_record {
    ($record:ident, $field:ident) => {
        impl ArrayRecord for $record {
            const FIELDS: &'static [&'static str] = &[stringify!($field)];

            fn to_array(&self) -> Vec<f64> {
                vec![self.$field]
            }

            fn from_array(values: &[f64]) -> Result<Self, GymError> {
                Self::check_width(values)?;
                Ok(Self { $field: values[0] })
            }
        }
    };
}

scalar_record!(Level, level);
scalar_record!(Outflow, outflow);
scalar_record!(Valve, opening);
scalar_record!(Inflow, inflow);

impl ArrayRecord for Ticks {
    const FIELDS: &'static [&'static str] = &["tick", "limit"];

    fn to_array(&self) -> Vec<f64> {
        vec![f64::from(self.tick), f64::from(self.limit)]
    }

    fn from_array(values: &[f64]) -> Result<Self, GymError> {
        Self::check_width(values)?;
        Ok(Self {
            tick: integral_field("tick", values[0])?,
            limit: integral_field("limit", values[1])?,
        })
    }
}

impl Observation for Gauge {
    fn to_array(&self) -> Vec<f64> {
        vec![self.0]
    }
}

impl Domain for Tank {
    type PhysicalParameters = TankParameters;
    type DaeState = Level;
    type DaeParameters = Outflow;
    type NonDaeParameters = Ticks;
    type Action = Valve;
    type DaeAction = Inflow;
    type Observation = Gauge;
}

const MAX_INFLOW: f64 = 2.0;

struct Parameters(ParameterSampler);

impl PhysicalParametersGenerator<Tank> for Parameters {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<TankParameters, GymError> {
        let values = self.0.sample(rng)?;
        Ok(TankParameters {
            outflow: values.scalar("outflow")?,
            limit: values.counter("limit")?,
        })
    }
}

struct Initial;

impl InitialStateGenerator<Tank> for Initial {
    fn generate(&self, parameters: &TankParameters) -> Result<StateOf<Tank>, GymError> {
        State::new(
            Level { level: 1.0 },
            Outflow {
                outflow: parameters.outflow,
            },
            Ticks {
                tick: 0,
                limit: parameters.limit,
            },
        )
    }
}

struct Logged(Log);

impl StatePreprocessor<Tank> for Logged {
    fn preprocess_state(&self, state: &StateOf<Tank>) -> Result<StateOf<Tank>, GymError> {
        self.0.borrow_mut().push("preprocess state");
        Ok(state.clone())
    }
}

impl StatePostprocessor<Tank> for Logged {
    fn postprocess_state(&self, state: StateOf<Tank>) -> Result<StateOf<Tank>, GymError> {
        self.0.borrow_mut().push("postprocess state");
        Ok(state)
    }
}

impl ActionConverter<Tank> for Logged {
    fn action_to_dae_action(&self, action: &Valve, _: &StateOf<Tank>) -> Result<Inflow, GymError> {
        self.0.borrow_mut().push("convert");
        Ok(Inflow {
            inflow: action.opening * MAX_INFLOW,
        })
    }

    fn dae_action_to_action(
        &self,
        dae_action: &Inflow,
        _: &StateOf<Tank>,
    ) -> Result<Valve, GymError> {
        Ok(Valve {
            opening: dae_action.inflow / MAX_INFLOW,
        })
    }
}

impl ActionRegulator<Tank> for Logged {
    fn is_legal(&self, dae_action: &Inflow, _: &StateOf<Tank>) -> bool {
        self.0.borrow_mut().push("regulate");
        (0.0..=MAX_INFLOW).contains(&dae_action.inflow)
    }

    fn convert_to_legal_action(&self, dae_action: &Inflow, _: &StateOf<Tank>) -> Inflow {
        Inflow {
            inflow: dae_action.inflow.clamp(0.0, MAX_INFLOW),
        }
    }
}

impl TimeSpanCalculator<Tank> for Logged {
    fn calculate_time_span(
        &self,
        current_time: f64,
        state: &StateOf<Tank>,
    ) -> Result<TimeSpan, GymError> {
        self.0.borrow_mut().push("time span");
        TimeSpanCalculator::<Tank>::calculate_time_span(
            &FixedDurationTimeSpan::new(0.5)?,
            current_time,
            state,
        )
    }
}

impl ParameterAdvance<Tank> for Logged {
    fn next_dae_params(&self, state: &StateOf<Tank>) -> Result<Outflow, GymError> {
        self.0.borrow_mut().push("advance dae params");
        Ok(state.dae_params().clone())
    }

    fn next_non_dae_params(&self, state: &StateOf<Tank>) -> Result<Ticks, GymError> {
        self.0.borrow_mut().push("advance non-dae params");
        let ticks = state.non_dae_params();
        Ok(Ticks {
            tick: ticks.tick + 1,
            limit: ticks.limit,
        })
    }
}

/// Explicit Euler over the whole span: `level += (inflow - outflow) * dt`.
struct Bucket {
    log: Log,
    spans: Rc<RefCell<Vec<TimeSpan>>>,
}

impl Integrator for Bucket {
    fn integrate(
        &self,
        input_values: &[f64],
        parameters: &[f64],
        action: &[f64],
        time_span: TimeSpan,
    ) -> Result<Vec<f64>, SolverError> {
        self.log.borrow_mut().push("integrate");
        self.spans.borrow_mut().push(time_span);
        Ok(vec![input_values[0] + (action[0] - parameters[0]) * time_span.duration()])
    }

    fn action_duration(&self) -> f64 {
        0.5
    }

    fn method(&self) -> &'static str {
        "bucket"
    }
}

struct Extract {
    log: Log,
    space: BoxSpace,
    fail_reward: Rc<Cell<bool>>,
}

impl ObservationExtractor<Tank> for Extract {
    fn observation_space(&self) -> &BoxSpace {
        &self.space
    }

    fn extract_observation(&self, next_state: &StateOf<Tank>) -> Result<Gauge, GymError> {
        self.log.borrow_mut().push("observation");
        Ok(Gauge(next_state.dae_state().level))
    }
}

impl RewardExtractor<Tank> for Extract {
    fn extract_reward(
        &self,
        state: &StateOf<Tank>,
        _: &Inflow,
        next_state: &StateOf<Tank>,
    ) -> Result<f64, GymError> {
        self.log.borrow_mut().push("reward");
        if self.fail_reward.get() {
            return Err(GymError::Configuration("reward sensor offline".to_owned()));
        }
        Ok(next_state.dae_state().level - state.dae_state().level)
    }
}

impl TerminatedExtractor<Tank> for Extract {
    fn extract_terminated(
        &self,
        _: &StateOf<Tank>,
        _: &Inflow,
        next_state: &StateOf<Tank>,
    ) -> Result<bool, GymError> {
        self.log.borrow_mut().push("terminated");
        let ticks = next_state.non_dae_params();
        Ok(ticks.tick >= ticks.limit)
    }
}

impl TruncatedExtractor<Tank> for Extract {
    fn extract_truncated(
        &self,
        _: &StateOf<Tank>,
        _: &Inflow,
        next_state: &StateOf<Tank>,
    ) -> Result<bool, GymError> {
        self.log.borrow_mut().push("truncated");
        Ok(next_state.dae_state().level < 0.0)
    }
}

impl InfoExtractor<Tank> for Extract {
    fn extract_info(
        &self,
        state: Option<&StateOf<Tank>>,
        dae_action: Option<&Inflow>,
        _: &StateOf<Tank>,
    ) -> Result<Info, GymError> {
        self.log.borrow_mut().push("info");
        let mut info = Info::new();
        if let (Some(state), Some(dae_action)) = (state, dae_action) {
            info.insert("previous_level".to_owned(), json!(state.dae_state().level));
            info.insert("inflow".to_owned(), json!(dae_action.inflow));
        }
        Ok(info)
    }
}

struct Harness {
    log: Log,
    spans: Rc<RefCell<Vec<TimeSpan>>>,
    fail_reward: Rc<Cell<bool>>,
}

fn sampled_outflow() -> ParameterSampler {
    let uniform = match json!({"distribution": "uniform", "low": 0.1, "high": 0.4, "size": 1}) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    let config = ParametersGeneratorConfig::new(
        BTreeMap::from([("limit".to_owned(), 3.0)]),
        BTreeMap::from([("outflow".to_owned(), uniform)]),
    )
    .unwrap();
    ParameterSampler::new(&config, &SamplingRegistry::new()).unwrap()
}

fn builder(seed: u64) -> (EnvironmentBuilder<Tank>, Harness) {
    let harness = Harness {
        log: Rc::default(),
        spans: Rc::default(),
        fail_reward: Rc::default(),
    };
    let log = &harness.log;
    let extract = || Extract {
        log: Rc::clone(log),
        space: BoxSpace::new(vec![f64::NEG_INFINITY], vec![f64::INFINITY]).unwrap(),
        fail_reward: Rc::clone(&harness.fail_reward),
    };
    let pipeline = ActionPipeline::new(
        BoxSpace::uniform(0.0, 1.0, 1).unwrap(),
        Logged(Rc::clone(log)),
        Logged(Rc::clone(log)),
    )
    .unwrap();
    let builder = Environment::builder(seed)
        .physical_parameters_generator(Parameters(sampled_outflow()))
        .initial_state_generator(Initial)
        .state_preprocessor(Logged(Rc::clone(log)))
        .state_postprocessor(Logged(Rc::clone(log)))
        .action_preprocessor(pipeline)
        .integrator(Box::new(Bucket {
            log: Rc::clone(log),
            spans: Rc::clone(&harness.spans),
        }))
        .time_span_calculator(Logged(Rc::clone(log)))
        .parameter_advance(Logged(Rc::clone(log)))
        .observation_extractor(extract())
        .reward_extractor(extract())
        .terminated_extractor(extract())
        .truncated_extractor(extract())
        .info_extractor(extract());
    (builder, harness)
}

fn environment(seed: u64) -> (Environment<Tank>, Harness) {
    let (builder, harness) = builder(seed);
    (builder.build().unwrap(), harness)
}

#[test]
fn missing_collaborator_fails_construction() {
    let err = EnvironmentBuilder::<Tank>::new(0)
        .physical_parameters_generator(Parameters(sampled_outflow()))
        .initial_state_generator(Initial)
        .identity_state_processing()
        .build()
        .err()
        .unwrap();
    assert!(err.is_configuration());
    assert!(matches!(err, GymError::MissingCollaborator("action preprocessor")));
}

#[test]
fn step_runs_the_pipeline_in_order() {
    let (mut env, harness) = environment(0);
    env.reset(Some(0), None).unwrap();
    harness.log.borrow_mut().clear();

    env.step(&[0.5]).unwrap();
    assert_eq!(
        *harness.log.borrow(),
        [
            "preprocess state",
            "convert",
            "regulate",
            "time span",
            "integrate",
            "advance dae params",
            "advance non-dae params",
            "postprocess state",
            "observation",
            "reward",
            "terminated",
            "truncated",
            "info",
        ]
    );
}

#[test]
fn step_commits_state_time_and_counter() {
    let (mut env, harness) = environment(1);
    let (observation, info) = env.reset(None, None).unwrap();
    assert_eq!(observation, [1.0]);
    assert!(info.is_empty());

    let outflow = env.state().dae_params().outflow;
    let first = env.step(&[0.5]).unwrap();
    let expected = 1.0 + (1.0 - outflow) * 0.5;
    assert_relative_eq!(first.observation[0], expected, epsilon = 1e-12);
    assert_relative_eq!(first.reward, expected - 1.0, epsilon = 1e-12);
    assert_eq!(first.info["previous_level"], json!(1.0));
    assert_eq!(env.step_counter(), 1);
    assert_eq!(env.current_time(), 0.5);
    assert_eq!(env.state().non_dae_params().tick, 1);

    env.step(&[0.5]).unwrap();
    assert_eq!(
        *harness.spans.borrow(),
        [TimeSpan::new(0.0, 0.5), TimeSpan::new(0.5, 1.0)]
    );
    assert_eq!(env.current_time(), 1.0);
}

#[test]
fn failing_collaborator_leaves_the_environment_untouched() {
    let (mut env, harness) = environment(2);
    env.step(&[1.0]).unwrap();
    let state = env.state().clone();

    harness.fail_reward.set(true);
    assert!(env.step(&[1.0]).is_err());
    assert_eq!(env.state(), &state);
    assert_eq!(env.step_counter(), 1);
    assert_eq!(env.current_time(), 0.5);

    let err = env.step(&[1.0, 0.0]).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(env.step_counter(), 1);

    harness.fail_reward.set(false);
    env.step(&[1.0]).unwrap();
    assert_eq!(env.step_counter(), 2);
}

#[test]
fn illegal_actions_are_clamped_silently() {
    let (mut env, _) = environment(3);
    let info = env.step(&[7.0]).unwrap().info;
    assert_eq!(info["inflow"], json!(MAX_INFLOW));
    let info = env.step(&[-3.0]).unwrap().info;
    assert_eq!(info["inflow"], json!(0.0));
}

#[test]
fn reset_restarts_the_episode() {
    let (mut env, _) = environment(4);
    env.step(&[1.0]).unwrap();
    env.step(&[1.0]).unwrap();

    let (observation, _) = env.reset(Some(4), None).unwrap();
    assert_eq!(observation, [1.0]);
    assert_eq!(env.step_counter(), 0);
    assert_eq!(env.current_time(), 0.0);
    assert_eq!(env.seed(), 4);
}

#[test]
fn same_seed_gives_the_same_episode() {
    let (mut a, _) = environment(11);
    let (mut b, _) = environment(11);
    a.reset(Some(5), None).unwrap();
    b.reset(Some(5), None).unwrap();
    assert_eq!(a.physical_parameters().outflow, b.physical_parameters().outflow);
    for action in [0.1, 0.9, 0.4] {
        assert_eq!(a.step(&[action]).unwrap(), b.step(&[action]).unwrap());
    }

    let (mut c, _) = environment(11);
    c.reset(Some(6), None).unwrap();
    assert_ne!(a.physical_parameters().outflow, c.physical_parameters().outflow);
}

#[test]
fn unseeded_reset_continues_the_stream() {
    let (mut env, _) = environment(8);
    let first = env.physical_parameters().outflow;
    env.reset(None, None).unwrap();
    let second = env.physical_parameters().outflow;
    assert_ne!(first, second);
    assert_eq!(env.seed(), 8);
}

fn run_generic<E: Env>(env: &mut E, action: f64) -> usize {
    assert_eq!(env.action_space().shape(), 1);
    assert_eq!(env.observation_space().shape(), 1);
    env.reset(Some(0), None).unwrap();
    let mut steps = 1;
    while !env.step(&[action]).unwrap().is_done() {
        steps += 1;
    }
    steps
}

#[test]
fn environment_drives_through_the_env_trait() {
    let (mut env, _) = environment(0);
    assert_eq!(run_generic(&mut env, 0.5), 3);
}

#[test]
fn recorded_episode_ends_with_termination() {
    let (mut env, _) = environment(9);
    let full_open = |_: &[f64], space: &BoxSpace| space.high().to_vec();
    let rollout = record_episode(&mut env, Some(9), None, full_open).unwrap();
    let transitions = rollout.transitions();
    assert_eq!(transitions.len(), 4);
    assert_eq!(transitions[0].action, None);
    assert_eq!(transitions[3].terminated, Some(true));
    assert_eq!(transitions[3].truncated, Some(false));
    assert_eq!(transitions[1].action.as_deref(), Some(&[1.0][..]));

    let (mut replay, _) = environment(9);
    let again = record_episode(&mut replay, Some(9), Some(10), full_open).unwrap();
    assert!(rollout.approx_eq(&again, 0.0, 0.0));
}

/// Rewrites the step limit the integrator path sees.
struct ZeroLimit;

impl StatePreprocessor<Tank> for ZeroLimit {
    fn preprocess_state(&self, state: &StateOf<Tank>) -> Result<StateOf<Tank>, GymError> {
        State::new(
            state.dae_state().clone(),
            state.dae_params().clone(),
            Ticks {
                tick: state.non_dae_params().tick,
                limit: 0,
            },
        )
    }
}

/// Records the limit each collaborator was handed.
struct SeenLimits(Rc<RefCell<Vec<(&'static str, u32)>>>);

impl ActionConverter<Tank> for SeenLimits {
    fn action_to_dae_action(
        &self,
        action: &Valve,
        state: &StateOf<Tank>,
    ) -> Result<Inflow, GymError> {
        self.0
            .borrow_mut()
            .push(("convert", state.non_dae_params().limit));
        Ok(Inflow {
            inflow: action.opening * MAX_INFLOW,
        })
    }

    fn dae_action_to_action(
        &self,
        dae_action: &Inflow,
        _: &StateOf<Tank>,
    ) -> Result<Valve, GymError> {
        Ok(Valve {
            opening: dae_action.inflow / MAX_INFLOW,
        })
    }
}

impl TimeSpanCalculator<Tank> for SeenLimits {
    fn calculate_time_span(
        &self,
        current_time: f64,
        state: &StateOf<Tank>,
    ) -> Result<TimeSpan, GymError> {
        self.0
            .borrow_mut()
            .push(("time span", state.non_dae_params().limit));
        Ok(TimeSpan::starting_at(current_time, 0.5))
    }
}

#[test]
fn action_and_time_span_see_the_committed_state() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let (builder, harness) = builder(12);
    let pipeline = ActionPipeline::new(
        BoxSpace::uniform(0.0, 1.0, 1).unwrap(),
        SeenLimits(Rc::clone(&seen)),
        Logged(Rc::clone(&harness.log)),
    )
    .unwrap();
    let mut env = builder
        .state_preprocessor(ZeroLimit)
        .action_preprocessor(pipeline)
        .time_span_calculator(SeenLimits(Rc::clone(&seen)))
        .build()
        .unwrap();
    assert_eq!(env.state().non_dae_params().limit, 3);

    env.step(&[0.5]).unwrap();
    assert_eq!(*seen.borrow(), [("convert", 3), ("time span", 3)]);
    // Parameter advance works on the preprocessed state.
    assert_eq!(env.state().non_dae_params().limit, 0);
}
