//! Presence Toggle (state machine)
//!
//! Per member two states over the dashboard session log:
//!
//! - **OUTSIDE**: no open session → a grant opens one (entry)
//! - **INSIDE**: exactly one open session → a grant closes it (exit)
//!
//! Planning is pure; the caller reads the aggregate, plans, writes, all
//! under the per-member lock so a double card read cannot double-register
//! an entry or lose an exit.

use chrono::NaiveDate;

use shared::models::{Dashboard, Member, Session};

/// A planned state transition for one grant
#[derive(Debug, Clone)]
pub enum Transition {
    Entry {
        session_id: String,
        session: Session,
    },
    Exit {
        session_id: String,
        exit: i64,
        dwell_secs: i64,
    },
}

impl Transition {
    /// Reader-facing result message
    pub fn message(&self) -> String {
        match self {
            Transition::Entry { .. } => "Entry recorded".to_string(),
            Transition::Exit { dwell_secs, .. } => {
                format!("Exit recorded: dwell {}", format_dwell(*dwell_secs))
            }
        }
    }
}

/// Decide entry vs exit for a granted member.
///
/// Session ids are millisecond timestamps suffixed with the member id:
/// monotonically distinguishable, unique across members entering in the
/// same instant, and free of '.' so dotted-path exits stay well-formed.
pub fn plan_transition(
    dashboard: &Dashboard,
    member: &Member,
    plan_name: &str,
    membership_end: NaiveDate,
    now_millis: i64,
) -> Transition {
    if let Some((session_id, open)) = dashboard.open_session(&member.id) {
        return Transition::Exit {
            session_id: session_id.clone(),
            exit: now_millis,
            dwell_secs: (now_millis - open.entry) / 1000,
        };
    }

    Transition::Entry {
        session_id: format!("{now_millis}-{}", member.id),
        session: Session {
            member_id: member.id.clone(),
            name: member.name.clone(),
            email: member.email.clone(),
            plan: plan_name.to_string(),
            membership_end,
            entry: now_millis,
            exit: None,
            dwell_secs: None,
        },
    }
}

/// Seconds → "HH:MM:SS" (hours do not wrap, a 26h dwell prints as 26)
pub fn format_dwell(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
