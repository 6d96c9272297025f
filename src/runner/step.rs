//! Ordered step execution

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info};

use crate::commands::{CommandStep, ExecutionModel};

use super::provider::{Session, SessionHost, SessionProvider};

/// Drives an ordered list of command steps to completion.
///
/// Steps run strictly in order; the runner never starts a step before the
/// previous one has been dispatched. A step with `min_second` set suspends
/// the runner without blocking the host runtime, and forces the following
/// step onto a fresh session even under the serial model.
pub struct StepRunner<H: SessionHost> {
    provider: SessionProvider<H>,
    model: Option<ExecutionModel>,
    project_path: PathBuf,
}

impl<H: SessionHost> StepRunner<H> {
    pub fn new(host: H, model: Option<ExecutionModel>, project_path: PathBuf) -> Self {
        Self {
            provider: SessionProvider::new(host),
            model,
            project_path,
        }
    }

    /// Execute `list` from `start` to the end of the list.
    ///
    /// There is no error path: a step whose session is unavailable is
    /// skipped and the list still advances to its end.
    pub async fn run(&mut self, list: &[CommandStep], start: usize) {
        for (index, step) in list.iter().enumerate().skip(start) {
            debug!("Dispatching step {index}: {}", step.script);
            self.dispatch(step);
            if let Some(secs) = step.min_second
                && secs > 0
            {
                // The next serial step must not land in this session
                self.provider.clear_shared();
                debug!("Pausing {secs}s before step {}", index + 1);
                tokio::time::sleep(Duration::from_secs(secs)).await;
            }
        }
        info!("Finished {} steps", list.len().saturating_sub(start));
    }

    /// Send one step into its session: optional directory change first,
    /// then the script, then bring the session to the foreground.
    fn dispatch(&mut self, step: &CommandStep) {
        let cwd = self.project_path.join(&step.exec_directory);
        let Some(session) = self.provider.acquire(self.model, &cwd) else {
            debug!("No session available, skipping dispatch");
            return;
        };
        if let Some(dir) = &step.switch_directory {
            let target = self.project_path.join(dir);
            session.send_text(&format!("cd {}", target.display()));
        }
        session.send_text(&step.script);
        session.show();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use crate::pty::terminal::ProcessError;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Created { session: usize, cwd: PathBuf },
        Sent { session: usize, text: String },
        Shown { session: usize },
    }

    #[derive(Default)]
    struct RecordingHost {
        events: Arc<Mutex<Vec<Event>>>,
        counter: AtomicUsize,
        fail: bool,
    }

    struct RecordingSession {
        id: usize,
        events: Arc<Mutex<Vec<Event>>>,
    }

    impl Session for RecordingSession {
        fn send_text(&self, text: &str) {
            self.events.lock().push(Event::Sent {
                session: self.id,
                text: text.to_string(),
            });
        }

        fn show(&self) {
            self.events.lock().push(Event::Shown { session: self.id });
        }
    }

    impl SessionHost for RecordingHost {
        type Session = RecordingSession;

        fn create(&self, cwd: &Path, _label: &str) -> Result<RecordingSession, ProcessError> {
            if self.fail {
                return Err(ProcessError::PtyError("spawning disabled".to_string()));
            }
            let id = self.counter.fetch_add(1, Ordering::Relaxed);
            self.events.lock().push(Event::Created {
                session: id,
                cwd: cwd.to_path_buf(),
            });
            Ok(RecordingSession {
                id,
                events: Arc::clone(&self.events),
            })
        }
    }

    fn runner(model: &str) -> (StepRunner<RecordingHost>, Arc<Mutex<Vec<Event>>>) {
        let host = RecordingHost::default();
        let events = Arc::clone(&host.events);
        let runner = StepRunner::new(
            host,
            ExecutionModel::from_name(model),
            PathBuf::from("/project"),
        );
        (runner, events)
    }

    fn step(dir: &str, script: &str) -> CommandStep {
        CommandStep {
            exec_directory: PathBuf::from(dir),
            script: script.to_string(),
            ..Default::default()
        }
    }

    fn timed_step(dir: &str, script: &str, secs: u64) -> CommandStep {
        CommandStep {
            min_second: Some(secs),
            ..step(dir, script)
        }
    }

    fn sends(events: &[Event]) -> Vec<(usize, String)> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::Sent { session, text } => Some((*session, text.clone())),
                _ => None,
            })
            .collect()
    }

    fn created(events: &[Event]) -> Vec<(usize, PathBuf)> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::Created { session, cwd } => Some((*session, cwd.clone())),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_serial_steps_share_one_session() {
        let (mut runner, events) = runner("serial");
        runner
            .run(&[step("a", "build"), step("b", "test")], 0)
            .await;

        let events = events.lock();
        assert_eq!(created(&events), vec![(0, PathBuf::from("/project/a"))]);
        assert_eq!(
            sends(&events),
            vec![(0, "build".to_string()), (0, "test".to_string())]
        );
    }

    #[tokio::test]
    async fn test_dispatch_order_matches_list_order() {
        let (mut runner, events) = runner("serial");
        let list: Vec<CommandStep> = ["one", "two", "three", "four"]
            .into_iter()
            .map(|script| step("a", script))
            .collect();
        runner.run(&list, 0).await;

        let texts: Vec<String> = sends(&events.lock()).into_iter().map(|(_, t)| t).collect();
        assert_eq!(texts, vec!["one", "two", "three", "four"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_step_forces_a_fresh_serial_session() {
        let (mut runner, events) = runner("serial");
        let begun = tokio::time::Instant::now();
        runner
            .run(&[timed_step("a", "build", 2), step("b", "test")], 0)
            .await;

        assert!(begun.elapsed() >= Duration::from_secs(2));
        let events = events.lock();
        assert_eq!(
            created(&events),
            vec![
                (0, PathBuf::from("/project/a")),
                (1, PathBuf::from("/project/b"))
            ]
        );
        assert_eq!(
            sends(&events),
            vec![(0, "build".to_string()), (1, "test".to_string())]
        );
    }

    #[tokio::test]
    async fn test_parallel_steps_each_get_a_session() {
        let (mut runner, events) = runner("parallel");
        runner
            .run(&[step("a", "one"), step("a", "two"), step("a", "three")], 0)
            .await;

        let events = events.lock();
        assert_eq!(created(&events).len(), 3);
        assert_eq!(
            sends(&events),
            vec![
                (0, "one".to_string()),
                (1, "two".to_string()),
                (2, "three".to_string())
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_model_sends_nothing_but_advances() {
        let (mut runner, events) = runner("burst");
        let begun = tokio::time::Instant::now();
        runner
            .run(&[step("a", "build"), timed_step("b", "watch", 1), step("c", "test")], 0)
            .await;

        // The delay between steps still applies without a session
        assert!(begun.elapsed() >= Duration::from_secs(1));
        assert!(events.lock().is_empty());
    }

    #[tokio::test]
    async fn test_switch_directory_sends_cd_before_the_script() {
        let (mut runner, events) = runner("serial");
        let mut with_switch = step("a", "build");
        with_switch.switch_directory = Some(PathBuf::from("web"));
        runner.run(&[with_switch], 0).await;

        let expected_cd = format!("cd {}", Path::new("/project").join("web").display());
        assert_eq!(
            sends(&events.lock()),
            vec![(0, expected_cd), (0, "build".to_string())]
        );
    }

    #[tokio::test]
    async fn test_session_is_shown_after_each_dispatch() {
        let (mut runner, events) = runner("serial");
        runner.run(&[step("a", "build"), step("b", "test")], 0).await;

        let shown = events
            .lock()
            .iter()
            .filter(|e| matches!(e, Event::Shown { .. }))
            .count();
        assert_eq!(shown, 2);
    }

    #[tokio::test]
    async fn test_empty_list_is_a_no_op() {
        let (mut runner, events) = runner("serial");
        runner.run(&[], 0).await;
        assert!(events.lock().is_empty());
    }

    #[tokio::test]
    async fn test_start_index_skips_earlier_steps() {
        let (mut runner, events) = runner("serial");
        runner
            .run(&[step("a", "build"), step("b", "test")], 1)
            .await;

        let events = events.lock();
        assert_eq!(created(&events), vec![(0, PathBuf::from("/project/b"))]);
        assert_eq!(sends(&events), vec![(0, "test".to_string())]);
    }

    #[tokio::test]
    async fn test_start_index_past_the_end_terminates() {
        let (mut runner, events) = runner("serial");
        runner.run(&[step("a", "build")], 5).await;
        assert!(events.lock().is_empty());
    }

    #[tokio::test]
    async fn test_failed_spawn_skips_sends_but_advances() {
        let host = RecordingHost {
            fail: true,
            ..RecordingHost::default()
        };
        let events = Arc::clone(&host.events);
        let mut runner = StepRunner::new(
            host,
            ExecutionModel::from_name("serial"),
            PathBuf::from("/project"),
        );
        runner.run(&[step("a", "build"), step("b", "test")], 0).await;
        assert!(events.lock().is_empty());
    }
}
