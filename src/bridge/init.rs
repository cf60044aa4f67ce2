//! Two-try initialization policy.
//!
//! The caller's arguments are tried first. If the backend rejects them, the
//! instruction set is replaced with [`HIJACK_ISA`] and the call is retried
//! exactly once with the other arguments untouched.
//!
//! ```text
//! NotStarted -> TriedOriginal(true)  -> Done(true)
//!            -> TriedOriginal(false) -> TriedHijack(r) -> Done(r)
//! ```

use std::ffi::CStr;
use std::os::raw::c_char;

/// Instruction set substituted on the second attempt. Fixed regardless of the
/// platform's actual guest ISA.
pub const HIJACK_ISA: &CStr = c"arm64";

/// Which argument set a backend call is made with.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Attempt {
    Original,
    Hijack,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InitState {
    NotStarted,
    TriedOriginal(bool),
    TriedHijack(bool),
    Done(bool),
}

impl InitState {
    /// Perform at most one backend call and move to the next state.
    ///
    /// `attempt` receives the isa to pass and which attempt it is.
    pub fn step<F>(self, requested: *const c_char, attempt: &mut F) -> InitState
    where
        F: FnMut(*const c_char, Attempt) -> bool,
    {
        match self {
            InitState::NotStarted => InitState::TriedOriginal(attempt(requested, Attempt::Original)),
            InitState::TriedOriginal(true) => InitState::Done(true),
            InitState::TriedOriginal(false) => {
                InitState::TriedHijack(attempt(HIJACK_ISA.as_ptr(), Attempt::Hijack))
            }
            InitState::TriedHijack(accepted) => {
                if accepted {
                    log::info!("[+] [Initialize] Tried hijack params succeeded");
                } else {
                    log::error!("[-] [Initialize] Tried hijack params failed, unknown error");
                }
                InitState::Done(accepted)
            }
            done @ InitState::Done(_) => done,
        }
    }
}

/// Drive the policy to completion and return the final verdict.
///
/// `attempt` runs once when the backend accepts the original arguments and
/// twice otherwise; never more.
pub fn run<F>(requested: *const c_char, mut attempt: F) -> bool
where
    F: FnMut(*const c_char, Attempt) -> bool,
{
    let mut state = InitState::NotStarted;
    loop {
        state = state.step(requested, &mut attempt);
        if let InitState::Done(result) = state {
            return result;
        }
    }
}
