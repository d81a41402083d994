//! Scoped interception of process-exit requests.
//!
//! Shells and consoles evaluate arbitrary scripts; a script calling `exit`
//! must end the session, not the host build. While a guard is held, exit
//! requests are recorded instead of terminating the process. The previous
//! state is restored when the guard drops, on every exit path.

use std::sync::Mutex;

#[derive(Debug, Default)]
struct State {
    depth: usize,
    attempts: Vec<i32>,
}

static STATE: Mutex<State> = Mutex::new(State {
    depth: 0,
    attempts: Vec::new(),
});

/// RAII scope during which exit requests are intercepted.
///
/// Guards nest; interception stays active until the outermost guard drops.
#[derive(Debug)]
pub struct ExitGuard(());

impl ExitGuard {
    pub fn acquire() -> Self {
        let mut state = STATE.lock().expect("exit guard state poisoned");
        state.depth += 1;
        ExitGuard(())
    }

    /// Exit codes intercepted since the outermost guard was acquired
    pub fn attempts(&self) -> Vec<i32> {
        STATE.lock().expect("exit guard state poisoned").attempts.clone()
    }
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        let mut state = STATE.lock().expect("exit guard state poisoned");
        state.depth -= 1;
        if state.depth == 0 {
            state.attempts.clear();
        }
    }
}

/// Request process termination.
///
/// Returns `true` when a guard intercepted the request; `false` means no
/// guard is active and the caller owns the decision to terminate.
#[must_use]
pub fn request_exit(code: i32) -> bool {
    let mut state = STATE.lock().expect("exit guard state poisoned");
    if state.depth > 0 {
        tracing::debug!("Intercepted exit request with code {}", code);
        state.attempts.push(code);
        true
    } else {
        false
    }
}

/// Serializes tests that assert on the process-global guard state
#[cfg(test)]
pub(crate) static TEST_MUTEX: Mutex<()> = Mutex::new(());
