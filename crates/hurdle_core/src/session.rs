//! Run orchestration: per-tick updates, obstacle spawning, scoring, and the
//! active/game-over state machine.
//!
//! The session is the single owner and sole mutator of simulation state.
//! The outer loop feeds it one `SessionInput` per fixed step and reads state
//! back between steps; nothing here touches windowing or GPU types, so the
//! same simulation runs under the game binary, the tests, and replays.

use crate::actor::Actor;
use crate::collision::overlaps;
use crate::config::RunnerConfig;
use crate::obstacle::Obstacle;

/// Horizontal anchor of the actor. The world scrolls; the actor does not.
const ACTOR_X: f32 = 100.0;

/// Edge-triggered input flags for one fixed step.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionInput {
    pub jump_pressed: bool,
    pub restart_pressed: bool,
}

/// Run state. `GameOver` freezes the simulation until a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    GameOver,
}

#[derive(Debug)]
pub struct GameSession {
    config: RunnerConfig,
    actor: Actor,
    obstacles: Vec<Obstacle>,
    score: u32,
    phase: SessionPhase,
    /// Ticks since the last spawn.
    spawn_counter: u32,
    /// Current ticks-between-spawns, ramping down toward the config floor.
    spawn_interval: u32,
}

impl GameSession {
    /// Validate the config and build a fresh run.
    pub fn new(config: RunnerConfig) -> Result<Self, String> {
        config.validate()?;
        let actor = spawn_actor(&config);
        let spawn_interval = config.initial_spawn_interval;
        Ok(Self {
            config,
            actor,
            obstacles: Vec::new(),
            score: 0,
            phase: SessionPhase::Active,
            spawn_counter: 0,
            spawn_interval,
        })
    }

    /// Wholesale reset: fresh actor, no obstacles, zero score, initial spawn
    /// pacing, back to `Active`.
    pub fn restart(&mut self) {
        log::info!("Restarting run (previous score {})", self.score);
        self.actor = spawn_actor(&self.config);
        self.obstacles.clear();
        self.score = 0;
        self.phase = SessionPhase::Active;
        self.spawn_counter = 0;
        self.spawn_interval = self.config.initial_spawn_interval;
    }

    /// Advance one fixed step.
    ///
    /// While game over, only input is examined: a restart press (or a jump
    /// press, which doubles as restart on that screen) starts a new run and
    /// the tick ends there. While active, a restart press is ignored, a jump
    /// press delegates to the actor, and then the update order is fixed:
    /// actor physics, spawning, obstacle movement and scoring, and last the
    /// collision check that decides whether this run ends.
    pub fn tick(&mut self, input: &SessionInput) {
        if self.phase == SessionPhase::GameOver {
            if input.restart_pressed || input.jump_pressed {
                self.restart();
            }
            return;
        }

        if input.jump_pressed {
            self.actor.jump(self.config.jump_velocity);
        }

        self.actor.tick(self.config.gravity);
        self.tick_spawner();
        self.tick_obstacles();
        self.check_collisions();
    }

    fn tick_spawner(&mut self) {
        self.spawn_counter += 1;
        if self.spawn_counter < self.spawn_interval {
            return;
        }

        self.obstacles.push(Obstacle::new(
            self.config.screen_width,
            self.config.obstacle_spawn_y(),
            self.config.obstacle_size.width,
            self.config.obstacle_size.height,
        ));
        self.spawn_counter = 0;
        // Difficulty ramp: every spawn tightens the interval until the floor.
        self.spawn_interval = self
            .spawn_interval
            .saturating_sub(self.config.spawn_interval_step)
            .max(self.config.min_spawn_interval);
        log::debug!(
            "Spawned obstacle ({} active, next interval {} ticks)",
            self.obstacles.len(),
            self.spawn_interval
        );
    }

    fn tick_obstacles(&mut self) {
        for obstacle in &mut self.obstacles {
            obstacle.tick(self.config.scroll_speed);
        }

        // Single filtering pass: count the obstacles that left the screen,
        // award score for each, then drop them.
        let before = self.obstacles.len();
        self.obstacles.retain(|obstacle| !obstacle.is_off_screen());
        let cleared = (before - self.obstacles.len()) as u32;
        if cleared > 0 {
            self.score += cleared * self.config.score_per_obstacle;
            log::debug!("Cleared {} obstacle(s), score {}", cleared, self.score);
        }
    }

    fn check_collisions(&mut self) {
        let actor_box = self.actor.bounding_box();
        for obstacle in &self.obstacles {
            if overlaps(actor_box, obstacle.bounding_box()) {
                self.phase = SessionPhase::GameOver;
                log::info!("Run over at score {}", self.score);
                break;
            }
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    /// True until the first obstacle has been cleared on a live run. The
    /// intro prompt renders only while this holds.
    pub fn is_first_run(&self) -> bool {
        self.score == 0 && self.phase != SessionPhase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn spawn_counter(&self) -> u32 {
        self.spawn_counter
    }

    pub fn spawn_interval(&self) -> u32 {
        self.spawn_interval
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }
}

fn spawn_actor(config: &RunnerConfig) -> Actor {
    Actor::new(
        ACTOR_X,
        config.actor_size.width,
        config.actor_size.height,
        config.actor_rest_y(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_session() -> GameSession {
        GameSession::new(RunnerConfig::default()).expect("default config should validate")
    }

    fn idle() -> SessionInput {
        SessionInput::default()
    }

    fn jump() -> SessionInput {
        SessionInput {
            jump_pressed: true,
            restart_pressed: false,
        }
    }

    fn restart() -> SessionInput {
        SessionInput {
            jump_pressed: false,
            restart_pressed: true,
        }
    }

    /// An obstacle parked inside the grounded actor's box so the next tick
    /// must end the run.
    fn obstacle_at_actor() -> Obstacle {
        Obstacle::new(115.0, 310.0, 20.0, 40.0)
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let mut config = RunnerConfig::default();
        config.min_spawn_interval = 200;
        let err = GameSession::new(config).expect_err("bad config must not build a session");
        assert!(err.contains("min_spawn_interval"));
    }

    #[test]
    fn first_spawn_lands_on_the_initial_interval_tick() {
        let mut session = default_session();
        for _ in 0..89 {
            session.tick(&idle());
            assert!(session.obstacles().is_empty());
        }
        session.tick(&idle());
        assert_eq!(session.obstacles().len(), 1);
        // The new obstacle already scrolled once on its spawn tick.
        assert_eq!(session.obstacles()[0].x, 795.0);
        assert_eq!(session.obstacles()[0].y, 310.0);
    }

    #[test]
    fn spawn_interval_ramps_down_and_saturates_at_the_floor() {
        let config = RunnerConfig {
            initial_spawn_interval: 5,
            min_spawn_interval: 2,
            ..RunnerConfig::default()
        };
        let mut session = GameSession::new(config).expect("config should validate");

        let mut intervals_after_spawn = Vec::new();
        let mut seen = 0;
        for _ in 0..20 {
            session.tick(&idle());
            if session.obstacles().len() > seen {
                seen = session.obstacles().len();
                intervals_after_spawn.push(session.spawn_interval());
            }
        }

        // After N spawns the interval is max(floor, initial - N * step).
        assert_eq!(intervals_after_spawn, vec![4, 3, 2, 2, 2, 2, 2]);
    }

    #[test]
    fn collision_ends_the_run_and_keeps_score() {
        let mut session = default_session();
        session.score = 30;
        session.obstacles.push(obstacle_at_actor());

        session.tick(&idle());

        assert!(session.is_game_over());
        // Collision never awards or removes score.
        assert_eq!(session.score(), 30);
        assert_eq!(session.obstacles().len(), 1);
    }

    #[test]
    fn two_overlapping_obstacles_yield_a_single_game_over() {
        let mut session = default_session();
        session.obstacles.push(obstacle_at_actor());
        session.obstacles.push(Obstacle::new(120.0, 310.0, 20.0, 40.0));

        session.tick(&idle());
        assert!(session.is_game_over());
        assert_eq!(session.obstacles().len(), 2);

        // One restart is enough to get back to a live run: there is no
        // second pending transition.
        session.tick(&restart());
        assert!(!session.is_game_over());
        assert!(session.obstacles().is_empty());
    }

    #[test]
    fn game_over_freezes_all_simulation_state() {
        let mut session = default_session();
        session.obstacles.push(obstacle_at_actor());
        session.tick(&idle());
        assert!(session.is_game_over());

        let frozen_x = session.obstacles()[0].x;
        let frozen_y = session.actor().y;
        let frozen_score = session.score();
        for _ in 0..10 {
            session.tick(&idle());
        }
        assert!(session.is_game_over());
        assert_eq!(session.obstacles()[0].x, frozen_x);
        assert_eq!(session.actor().y, frozen_y);
        assert_eq!(session.score(), frozen_score);
    }

    #[test]
    fn restart_resets_the_whole_run() {
        let mut session = default_session();
        session.score = 70;
        session.spawn_interval = 40;
        session.spawn_counter = 17;
        session.obstacles.push(obstacle_at_actor());
        session.tick(&idle());
        assert!(session.is_game_over());

        session.tick(&restart());

        assert!(!session.is_game_over());
        assert_eq!(session.score(), 0);
        assert!(session.obstacles().is_empty());
        assert_eq!(session.spawn_interval(), 90);
        assert_eq!(session.spawn_counter(), 0);
        assert_eq!(session.actor().y, 290.0);
        assert_eq!(session.actor().velocity_y, 0.0);
        assert!(session.actor().grounded);
    }

    #[test]
    fn jump_press_doubles_as_restart_after_game_over() {
        let mut session = default_session();
        session.obstacles.push(obstacle_at_actor());
        session.tick(&idle());
        assert!(session.is_game_over());

        session.tick(&jump());
        assert!(!session.is_game_over());
        // The restart tick only restarts; physics resumes next tick, so the
        // press did not also queue a jump.
        assert!(session.actor().grounded);
    }

    #[test]
    fn restart_press_is_ignored_while_active() {
        let mut session = default_session();
        session.score = 30;
        session.tick(&restart());
        assert!(!session.is_game_over());
        assert_eq!(session.score(), 30);
    }

    #[test]
    fn score_is_awarded_per_exited_obstacle_in_one_pass() {
        let mut session = default_session();
        // Both are one tick away from fully crossing the left edge.
        session.obstacles.push(Obstacle::new(-16.0, 310.0, 20.0, 40.0));
        session.obstacles.push(Obstacle::new(-18.0, 310.0, 20.0, 40.0));

        session.tick(&idle());

        assert_eq!(session.score(), 20);
        assert!(session.obstacles().is_empty());

        // Score is monotonic: idle ticks never change it.
        for _ in 0..10 {
            session.tick(&idle());
        }
        assert_eq!(session.score(), 20);
    }

    #[test]
    fn first_run_indicator_tracks_score_and_phase() {
        let mut session = default_session();
        assert!(session.is_first_run());

        // Clearing an obstacle ends the introductory phase.
        session.obstacles.push(Obstacle::new(-16.0, 310.0, 20.0, 40.0));
        session.tick(&idle());
        assert_eq!(session.score(), 10);
        assert!(!session.is_first_run());

        // Game over also suppresses the prompt.
        session.obstacles.push(obstacle_at_actor());
        session.tick(&idle());
        assert!(session.is_game_over());
        assert!(!session.is_first_run());

        // A restarted run is introductory again.
        session.tick(&restart());
        assert!(session.is_first_run());
    }

    #[test]
    fn scripted_jump_clears_the_first_obstacle() {
        // Full-run check against the canonical tuning. The first obstacle
        // spawns on tick 90 and its box overlaps the grounded actor while
        // 80 < x < 140, which is ticks 222..=232. A jump pressed on tick
        // 215 keeps the actor's feet above the obstacle for that whole
        // window, and the obstacle exits the screen on tick 254.
        let mut session = default_session();

        for tick in 1..=260u32 {
            let input = SessionInput {
                jump_pressed: tick == 215,
                restart_pressed: false,
            };
            session.tick(&input);
            assert!(
                !session.is_game_over(),
                "run should survive the jump, died on tick {}",
                tick
            );
        }

        assert_eq!(session.score(), 10);
        assert_eq!(session.obstacles().len(), 1);
        assert!(!session.is_first_run());
        assert!(session.actor().grounded);
    }
}
