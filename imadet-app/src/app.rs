use anyhow::{Result, bail};
use imadet_staircase::{
    BlockSummary, CalibrationSession, CycleDecision, CycleLogEntry, MainExperiment,
    ParticipantVisibility, PracticeDecision, PracticeLoop, PracticeRoundReport, SessionConfig,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::observer::SimulatedObserver;

/// Gives up on a simulated participant that cannot pass practice.
const MAX_PRACTICE_ROUNDS: usize = 25;

/// Everything the run produced, printed as JSON at the end.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub response_prompt: String,
    pub frame_time_ms: u64,
    pub practice: Vec<PracticeRoundReport>,
    pub cycles: Vec<CycleLogEntry>,
    pub visibility: ParticipantVisibility,
    pub blocks: Vec<BlockSummary>,
}

pub struct App {
    config: SessionConfig,
    session: CalibrationSession<StdRng>,
    observer: SimulatedObserver,
    observer_rng: StdRng,
    task_rng: StdRng,
}

impl App {
    pub fn new(config: SessionConfig, observer: SimulatedObserver) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(seed, "seeding session");
        let session = CalibrationSession::new(config.clone(), StdRng::seed_from_u64(seed))?;
        let observer_rng = StdRng::seed_from_u64(seed.wrapping_add(1));
        let task_rng = StdRng::seed_from_u64(seed.wrapping_add(2));

        Ok(Self {
            config,
            session,
            observer,
            observer_rng,
            task_rng,
        })
    }

    pub fn run(mut self) -> Result<RunSummary> {
        let mapping = self.session.response_mapping();
        let frame_time_ms = self.session.frame_time_ms();
        info!(
            order = ?self.session.track_order(),
            prompt = %mapping.prompt(),
            frame_time_ms,
            "=== GRATING DETECTION STAIRCASE ==="
        );

        let practice = self.run_practice()?;

        while !self.session.is_complete() {
            let level = self.session.controller().visibility_level();
            for present in self.session.cycle_plan() {
                let frames = self.session.stimulus_frames(present)?;
                debug!(
                    present,
                    first = frames.first().map(String::as_str),
                    last = frames.last().map(String::as_str),
                    "animation"
                );
                let response = self.observer.respond(&mut self.observer_rng, present, level);
                self.session
                    .record_key(present, mapping.key_for(response))?;
            }

            if let CycleDecision::Finished { final_level, .. } = self.session.evaluate()? {
                info!(final_level, "track done");
            }
        }
        let visibility = self.session.finish()?;

        let blocks = self.run_main(visibility)?;

        Ok(RunSummary {
            response_prompt: mapping.prompt(),
            frame_time_ms,
            practice,
            cycles: self.session.cycle_log().to_vec(),
            visibility,
            blocks,
        })
    }

    fn run_practice(&mut self) -> Result<Vec<PracticeRoundReport>> {
        let mut practice = PracticeLoop::new(
            self.config.practice.clone(),
            self.config.staircase.initial_visibility_level,
        )?;

        loop {
            let level = practice.visibility_level();
            for kind in practice.round_plan(&mut self.task_rng) {
                let present = !kind.is_noise();
                let response = self.observer.respond(&mut self.observer_rng, present, level);
                practice.record(present, response)?;
            }
            match practice.evaluate()? {
                PracticeDecision::Passed(_) => break,
                PracticeDecision::Retry(report) if report.round >= MAX_PRACTICE_ROUNDS => {
                    bail!("practice not passed after {} rounds", report.round)
                }
                PracticeDecision::Retry(_) => {}
            }
        }
        Ok(practice.history().to_vec())
    }

    fn run_main(&mut self, visibility: ParticipantVisibility) -> Result<Vec<BlockSummary>> {
        let mapping = self.session.response_mapping();
        let mut main = MainExperiment::new(
            self.config.clone(),
            visibility,
            mapping,
            StdRng::from_rng(&mut self.task_rng),
        )?;

        while let Some(condition) = main.current_condition() {
            let level = visibility.level(condition.display);
            for present in main.trial_plan() {
                let response = self.observer.respond(&mut self.observer_rng, present, level);
                main.record_key(present, mapping.key_for(response))?;
            }
            let key = self
                .observer
                .report_imagery(&mut self.observer_rng, condition.imagine);
            main.check_imagery(key)?;
        }
        Ok(main.summaries().to_vec())
    }
}
