//! Status & alert evaluation for incoming sensor readings.
//!
//! Pure logic with no database access. The caller fetches the machine's active
//! alerts and current status, computes how long each door has been open, and
//! applies the returned actions (alert raise/resolve, status transition).

use std::collections::HashSet;

use chrono::Duration;

use crate::alert::{AlertType, Severity};
use crate::status::StatusKind;

/// Severity classification of a single channel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Classification {
    Normal,
    Warning,
    Critical,
}

/// Warning/critical cutoffs for one kind of channel.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdBand {
    pub warning: f64,
    pub critical: f64,
}

impl ThresholdBand {
    /// Classify a value against this band. Values at or above a cutoff
    /// belong to that class.
    pub fn classify(&self, value: f64) -> Classification {
        if value >= self.critical {
            Classification::Critical
        } else if value >= self.warning {
            Classification::Warning
        } else {
            Classification::Normal
        }
    }
}

/// Threshold policy for the evaluator.
///
/// Policy, not constants: every cutoff and the door grace period can be
/// overridden through server configuration.
#[derive(Debug, Clone, Copy)]
pub struct MonitorPolicy {
    pub temperature: ThresholdBand,
    pub speed: ThresholdBand,
    /// How long a door may stay open on an online machine before a door
    /// alert is raised.
    pub door_grace: Duration,
}

impl Default for MonitorPolicy {
    fn default() -> Self {
        Self {
            temperature: ThresholdBand {
                warning: 70.0,
                critical: 85.0,
            },
            speed: ThresholdBand {
                warning: 800.0,
                critical: 1200.0,
            },
            door_grace: Duration::seconds(60),
        }
    }
}

/// One sensor reading: four temperature channels, four speed channels,
/// two door-open flags.
#[derive(Debug, Clone, Copy)]
pub struct SensorSample {
    pub temperatures: [f64; 4],
    pub speeds: [f64; 4],
    pub doors_open: [bool; 2],
}

/// Everything the evaluator needs to know about the machine beyond the
/// sample itself.
#[derive(Debug, Clone)]
pub struct MachineView {
    /// Current status (latest `machine_status` row, or offline if none).
    pub current_status: StatusKind,
    /// Types of alerts currently active for this machine.
    pub active_alerts: HashSet<AlertType>,
    /// How long each door has been open. `None` when the door is closed.
    pub door_open_for: [Option<Duration>; 2],
}

/// An alert mutation decided by the evaluator.
///
/// Alerts are only ever raised or resolved here, never deleted.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertAction {
    Raise {
        alert_type: AlertType,
        severity: Severity,
        message: String,
    },
    Resolve {
        alert_type: AlertType,
    },
}

/// Result of evaluating one sample.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub actions: Vec<AlertAction>,
    /// Status transition to append, if any.
    pub transition: Option<StatusKind>,
}

/// Evaluate a sample against the policy and the machine's current state.
///
/// Upholds the core invariant: an action to raise an alert of type T is only
/// emitted when no active alert of type T exists, and a resolve only when one
/// does. Callers must still serialize concurrent evaluations for the same
/// machine (the alert store's partial unique index is the backstop).
pub fn evaluate(sample: &SensorSample, view: &MachineView, policy: &MonitorPolicy) -> Evaluation {
    let mut eval = Evaluation::default();

    let (temp_class, temp_channel, temp_value) =
        worst_channel(&sample.temperatures, &policy.temperature);
    let (speed_class, speed_channel, speed_value) = worst_channel(&sample.speeds, &policy.speed);

    apply_band(
        &mut eval.actions,
        view,
        AlertType::Temperature,
        temp_class,
        format!(
            "temperature{} reading {:.1} breached the {} threshold",
            temp_channel + 1,
            temp_value,
            class_label(temp_class)
        ),
    );
    apply_band(
        &mut eval.actions,
        view,
        AlertType::Speed,
        speed_class,
        format!(
            "speed{} reading {:.1} breached the {} threshold",
            speed_channel + 1,
            speed_value,
            class_label(speed_class)
        ),
    );

    apply_door_rule(&mut eval.actions, sample, view, policy);

    eval.transition = decide_transition(sample, view, temp_class, speed_class);
    eval
}

/// Worst classification across a channel group, with the offending channel
/// index and value for the alert message.
fn worst_channel(values: &[f64; 4], band: &ThresholdBand) -> (Classification, usize, f64) {
    let mut worst = (Classification::Normal, 0, values[0]);
    for (idx, &value) in values.iter().enumerate() {
        let class = band.classify(value);
        if class > worst.0 {
            worst = (class, idx, value);
        }
    }
    worst
}

fn class_label(class: Classification) -> &'static str {
    match class {
        Classification::Critical => "critical",
        _ => "warning",
    }
}

/// Raise or resolve one threshold-driven alert type based on its worst
/// channel classification.
fn apply_band(
    actions: &mut Vec<AlertAction>,
    view: &MachineView,
    alert_type: AlertType,
    class: Classification,
    message: String,
) {
    let active = view.active_alerts.contains(&alert_type);
    match class {
        Classification::Normal if active => actions.push(AlertAction::Resolve { alert_type }),
        Classification::Warning if !active => actions.push(AlertAction::Raise {
            alert_type,
            severity: Severity::Medium,
            message,
        }),
        Classification::Critical if !active => actions.push(AlertAction::Raise {
            alert_type,
            severity: Severity::Critical,
            message,
        }),
        _ => {}
    }
}

/// Door rule: a door open past the grace period while the machine is online
/// raises a low-severity alert; the alert resolves once both doors close.
fn apply_door_rule(
    actions: &mut Vec<AlertAction>,
    sample: &SensorSample,
    view: &MachineView,
    policy: &MonitorPolicy,
) {
    let door_active = view.active_alerts.contains(&AlertType::Door);
    let all_closed = sample.doors_open.iter().all(|open| !open);

    if all_closed {
        if door_active {
            actions.push(AlertAction::Resolve {
                alert_type: AlertType::Door,
            });
        }
        return;
    }

    if door_active || view.current_status != StatusKind::Online {
        return;
    }

    for (idx, open_for) in view.door_open_for.iter().enumerate() {
        if let Some(duration) = open_for {
            if *duration > policy.door_grace {
                actions.push(AlertAction::Raise {
                    alert_type: AlertType::Door,
                    severity: Severity::Low,
                    message: format!(
                        "door{} open for {}s while machine is online",
                        idx + 1,
                        duration.num_seconds()
                    ),
                });
                return;
            }
        }
    }
}

/// Automatic status transitions.
///
/// Only flips between online and error; offline and maintenance are
/// operator-set states the evaluator never overrides.
fn decide_transition(
    sample: &SensorSample,
    view: &MachineView,
    temp_class: Classification,
    speed_class: Classification,
) -> Option<StatusKind> {
    let any_critical =
        temp_class == Classification::Critical || speed_class == Classification::Critical;
    let all_normal =
        temp_class == Classification::Normal && speed_class == Classification::Normal;
    let doors_closed = sample.doors_open.iter().all(|open| !open);

    match view.current_status {
        StatusKind::Online if any_critical => Some(StatusKind::Error),
        StatusKind::Error if all_normal && doors_closed => Some(StatusKind::Online),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_sample() -> SensorSample {
        SensorSample {
            temperatures: [20.0, 21.0, 19.5, 22.0],
            speeds: [400.0, 350.0, 0.0, 120.0],
            doors_open: [false, false],
        }
    }

    fn online_view() -> MachineView {
        MachineView {
            current_status: StatusKind::Online,
            active_alerts: HashSet::new(),
            door_open_for: [None, None],
        }
    }

    fn raises(eval: &Evaluation, alert_type: AlertType) -> Option<Severity> {
        eval.actions.iter().find_map(|a| match a {
            AlertAction::Raise {
                alert_type: t,
                severity,
                ..
            } if *t == alert_type => Some(*severity),
            _ => None,
        })
    }

    fn resolves(eval: &Evaluation, alert_type: AlertType) -> bool {
        eval.actions.iter().any(|a| {
            matches!(a, AlertAction::Resolve { alert_type: t } if *t == alert_type)
        })
    }

    #[test]
    fn quiet_sample_produces_nothing() {
        let eval = evaluate(&quiet_sample(), &online_view(), &MonitorPolicy::default());
        assert!(eval.actions.is_empty());
        assert!(eval.transition.is_none());
    }

    #[test]
    fn critical_temperature_raises_critical_alert() {
        let mut sample = quiet_sample();
        sample.temperatures[0] = 90.0; // above critical 85
        let eval = evaluate(&sample, &online_view(), &MonitorPolicy::default());
        assert_eq!(raises(&eval, AlertType::Temperature), Some(Severity::Critical));
    }

    #[test]
    fn warning_temperature_raises_medium_alert() {
        let mut sample = quiet_sample();
        sample.temperatures[2] = 75.0; // between warning 70 and critical 85
        let eval = evaluate(&sample, &online_view(), &MonitorPolicy::default());
        assert_eq!(raises(&eval, AlertType::Temperature), Some(Severity::Medium));
        assert!(eval.transition.is_none(), "warning alone must not flip status");
    }

    #[test]
    fn breach_with_existing_active_alert_is_silent() {
        let mut sample = quiet_sample();
        sample.temperatures[0] = 90.0;
        let mut view = online_view();
        view.active_alerts.insert(AlertType::Temperature);
        // Already in error from the earlier breach.
        view.current_status = StatusKind::Error;

        let eval = evaluate(&sample, &view, &MonitorPolicy::default());
        assert!(raises(&eval, AlertType::Temperature).is_none());
    }

    #[test]
    fn return_to_normal_resolves_active_alert() {
        let mut view = online_view();
        view.active_alerts.insert(AlertType::Temperature);
        let eval = evaluate(&quiet_sample(), &view, &MonitorPolicy::default());
        assert!(resolves(&eval, AlertType::Temperature));
    }

    #[test]
    fn excessive_speed_raises_speed_alert() {
        let mut sample = quiet_sample();
        sample.speeds[1] = 1300.0; // above critical 1200
        let eval = evaluate(&sample, &online_view(), &MonitorPolicy::default());
        assert_eq!(raises(&eval, AlertType::Speed), Some(Severity::Critical));
    }

    #[test]
    fn worst_channel_wins() {
        let mut sample = quiet_sample();
        sample.temperatures[1] = 72.0; // warning
        sample.temperatures[3] = 95.0; // critical
        let eval = evaluate(&sample, &online_view(), &MonitorPolicy::default());
        assert_eq!(raises(&eval, AlertType::Temperature), Some(Severity::Critical));
        let message = eval
            .actions
            .iter()
            .find_map(|a| match a {
                AlertAction::Raise { message, .. } => Some(message.clone()),
                _ => None,
            })
            .unwrap();
        assert!(message.contains("temperature4"), "message was: {message}");
    }

    #[test]
    fn door_open_past_grace_raises_low_alert() {
        let mut sample = quiet_sample();
        sample.doors_open[0] = true;
        let mut view = online_view();
        view.door_open_for[0] = Some(Duration::seconds(120));

        let eval = evaluate(&sample, &view, &MonitorPolicy::default());
        assert_eq!(raises(&eval, AlertType::Door), Some(Severity::Low));
    }

    #[test]
    fn door_within_grace_is_tolerated() {
        let mut sample = quiet_sample();
        sample.doors_open[1] = true;
        let mut view = online_view();
        view.door_open_for[1] = Some(Duration::seconds(10));

        let eval = evaluate(&sample, &view, &MonitorPolicy::default());
        assert!(raises(&eval, AlertType::Door).is_none());
    }

    #[test]
    fn door_alert_ignored_while_machine_offline() {
        let mut sample = quiet_sample();
        sample.doors_open[0] = true;
        let mut view = online_view();
        view.current_status = StatusKind::Offline;
        view.door_open_for[0] = Some(Duration::seconds(300));

        let eval = evaluate(&sample, &view, &MonitorPolicy::default());
        assert!(raises(&eval, AlertType::Door).is_none());
    }

    #[test]
    fn closing_doors_resolves_door_alert() {
        let mut view = online_view();
        view.active_alerts.insert(AlertType::Door);
        let eval = evaluate(&quiet_sample(), &view, &MonitorPolicy::default());
        assert!(resolves(&eval, AlertType::Door));
    }

    #[test]
    fn critical_breach_transitions_online_to_error() {
        let mut sample = quiet_sample();
        sample.speeds[0] = 1500.0;
        let eval = evaluate(&sample, &online_view(), &MonitorPolicy::default());
        assert_eq!(eval.transition, Some(StatusKind::Error));
    }

    #[test]
    fn recovery_transitions_error_back_to_online() {
        let mut view = online_view();
        view.current_status = StatusKind::Error;
        let eval = evaluate(&quiet_sample(), &view, &MonitorPolicy::default());
        assert_eq!(eval.transition, Some(StatusKind::Online));
    }

    #[test]
    fn maintenance_is_never_overridden() {
        let mut sample = quiet_sample();
        sample.temperatures[0] = 99.0;
        let mut view = online_view();
        view.current_status = StatusKind::Maintenance;
        let eval = evaluate(&sample, &view, &MonitorPolicy::default());
        assert!(eval.transition.is_none());
    }

    #[test]
    fn custom_policy_thresholds_apply() {
        let policy = MonitorPolicy {
            temperature: ThresholdBand {
                warning: 40.0,
                critical: 50.0,
            },
            speed: ThresholdBand {
                warning: 100.0,
                critical: 200.0,
            },
            door_grace: Duration::seconds(5),
        };
        let mut sample = quiet_sample();
        sample.temperatures[0] = 45.0;
        sample.speeds[0] = 250.0;

        let eval = evaluate(&sample, &online_view(), &policy);
        assert_eq!(raises(&eval, AlertType::Temperature), Some(Severity::Medium));
        assert_eq!(raises(&eval, AlertType::Speed), Some(Severity::Critical));
    }

    #[test]
    fn classify_boundary_values() {
        let band = ThresholdBand {
            warning: 70.0,
            critical: 85.0,
        };
        assert_eq!(band.classify(69.9), Classification::Normal);
        assert_eq!(band.classify(70.0), Classification::Warning);
        assert_eq!(band.classify(85.0), Classification::Critical);
    }
}
