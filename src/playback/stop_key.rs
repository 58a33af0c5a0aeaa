use super::controller::CancelToken;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

const KEY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Watches the terminal for a stop key while a song plays and cancels the
/// token when one is pressed. The watcher thread polls with a timeout so it
/// winds down promptly once playback ends and never swallows input meant
/// for the shell.
pub struct StopKeyWatcher {
    done: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl StopKeyWatcher {
    pub fn spawn(cancel: CancelToken) -> Self {
        let done = Arc::new(AtomicBool::new(false));
        let thread_done = done.clone();

        let handle = std::thread::spawn(move || {
            // Raw mode delivers Ctrl-C as a key event instead of a signal.
            let raw = terminal::enable_raw_mode().is_ok();
            while !thread_done.load(Ordering::Relaxed) && !cancel.is_cancelled() {
                match event::poll(KEY_POLL_INTERVAL) {
                    Ok(true) => {
                        if let Ok(Event::Key(key)) = event::read() {
                            if key.kind != KeyEventKind::Press {
                                continue;
                            }
                            let is_stop_key = matches!(
                                key.code,
                                KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')
                            ) || (key.code == KeyCode::Char('c')
                                && key.modifiers.contains(KeyModifiers::CONTROL));
                            if is_stop_key {
                                cancel.cancel();
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(_) => break,
                }
            }
            if raw {
                let _ = terminal::disable_raw_mode();
            }
        });

        StopKeyWatcher {
            done,
            handle: Some(handle),
        }
    }
}

impl Drop for StopKeyWatcher {
    fn drop(&mut self) {
        self.done.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
