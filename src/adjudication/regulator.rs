// Copyright 2025 Cowboy AI, LLC.

//! Regulator: consequence resolution for market conduct
//!
//! The regulator inspects each execution's newly appended events, reads the
//! projected snapshot, and emits consequence events. It runs inside the
//! engine's append critical section so consequences land atomically with
//! their trigger.
//!
//! The predatory-pricing threshold is a fixed fraction (80%) of the
//! estimated cost per load; with the default $0.75 cost a price under $0.60
//! draws a finding.

use crate::config::EngineConfig;
use crate::events::{
    EventDraft, EventPayload, GameEvent, InvestigationStarted, RegulatoryFinding,
    RegulatoryStatusUpdated, ScandalStarted,
};
use crate::state::{AgentState, RegulatoryStatus};
use tracing::info;
use uuid::Uuid;

/// Weeks between a finding and its fine falling due
const FINE_GRACE_WEEKS: u32 = 4;
/// Message length beyond which a communication smells of coordination
const COLLUSION_MESSAGE_LIMIT: usize = 240;
/// Messages to one counterpart within the window that trigger suspicion
const COLLUSION_FREQUENCY_LIMIT: usize = 3;
/// Weeks of history considered for communication frequency
const COLLUSION_WINDOW_WEEKS: u32 = 4;
/// Combined scandal severity that forces an investigation
const SCANDAL_ESCALATION_THRESHOLD: f64 = 1.0;
/// Open fines that force an investigation
const FINE_INVESTIGATION_COUNT: usize = 3;
/// Open fines that mark the agent as penalized
const FINE_PENALIZED_COUNT: usize = 5;

/// Inspects emitted events and issues findings, investigations, and status
/// changes.
#[derive(Debug, Clone)]
pub struct Regulator {
    config: EngineConfig,
}

impl Regulator {
    /// Create a regulator over the engine configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Review newly appended events against the post-append snapshot.
    ///
    /// `history` is a recent tail of the agent's stream for frequency
    /// checks. Consequences already present in the snapshot are not issued
    /// again, so replaying a trigger yields exactly one consequence set.
    pub fn review(
        &self,
        state: &AgentState,
        history: &[GameEvent],
        new_events: &[GameEvent],
    ) -> Vec<EventDraft> {
        let mut drafts = Vec::new();
        // Findings issued in this pass, for within-pass deduplication
        let mut issued_descriptions: Vec<String> = Vec::new();
        let mut issued_fines = 0usize;
        let mut started_investigation_reasons: Vec<String> = Vec::new();
        let mut scandal_started = false;

        for event in new_events {
            if event.agent_id != state.agent_id {
                continue;
            }
            match &event.payload {
                EventPayload::PriceSet(e) => {
                    if e.new_price < self.config.predatory_threshold() {
                        let description = format!(
                            "Predatory pricing on {:?} at {}",
                            e.service, e.location_id
                        );
                        if self.fresh_finding(state, &issued_descriptions, &description) {
                            info!(agent = %state.agent_id, %description, "regulatory finding");
                            issued_descriptions.push(description.clone());
                            issued_fines += 1;
                            drafts.push(finding(
                                description,
                                self.config.predatory_fine,
                                state.current_week + FINE_GRACE_WEEKS,
                            ));
                        }
                    }
                }
                EventPayload::WageAdjusted(e) => {
                    if e.new_rate < self.config.minimum_wage {
                        let description =
                            format!("Sub-minimum wage for {} at {}", e.staff_id, e.location_id);
                        if self.fresh_finding(state, &issued_descriptions, &description) {
                            issued_descriptions.push(description.clone());
                            issued_fines += 1;
                            drafts.push(finding(
                                description,
                                self.config.labor_fine,
                                state.current_week + FINE_GRACE_WEEKS,
                            ));
                        }
                    }
                }
                EventPayload::StaffHired(e) => {
                    if e.hourly_rate < self.config.minimum_wage {
                        let description =
                            format!("Sub-minimum hire {} at {}", e.staff_id, e.location_id);
                        if self.fresh_finding(state, &issued_descriptions, &description) {
                            issued_descriptions.push(description.clone());
                            issued_fines += 1;
                            drafts.push(finding(
                                description,
                                self.config.labor_fine,
                                state.current_week + FINE_GRACE_WEEKS,
                            ));
                        }
                    }
                }
                EventPayload::CommunicationSent(e) => {
                    let frequent = self.communication_count(
                        state,
                        history,
                        new_events,
                        &e.recipient_agent_id,
                    ) >= COLLUSION_FREQUENCY_LIMIT;
                    if e.message.len() > COLLUSION_MESSAGE_LIMIT || frequent {
                        let reason =
                            format!("Suspected collusion with {}", e.recipient_agent_id);
                        if self.fresh_investigation(
                            state,
                            &started_investigation_reasons,
                            &reason,
                        ) {
                            started_investigation_reasons.push(reason.clone());
                            drafts.push(investigation(reason, "MEDIUM"));
                        }
                    }
                }
                EventPayload::AllianceFormed(e) => {
                    let reason = format!(
                        "Potential antitrust violation through alliance with {}",
                        e.partner_agent_id
                    );
                    if self.fresh_investigation(state, &started_investigation_reasons, &reason) {
                        started_investigation_reasons.push(reason.clone());
                        drafts.push(investigation(reason, "MEDIUM"));
                        drafts.push(EventDraft::own(EventPayload::ScandalStarted(
                            ScandalStarted {
                                scandal_id: Uuid::new_v4().to_string(),
                                description: "Alleged price-fixing alliance".to_string(),
                                severity: 0.5,
                                duration_weeks: 8,
                                decay_rate: 0.1,
                            },
                        )));
                        scandal_started = true;
                    }
                }
                _ => {}
            }
        }

        // Status follows the evidence, and only ever tightens in one pass
        let open_fines = state.pending_fines.len() + issued_fines;
        let total_severity =
            state.total_scandal_severity() + if scandal_started { 0.5 } else { 0.0 };
        let desired = if open_fines >= FINE_PENALIZED_COUNT {
            RegulatoryStatus::Penalized
        } else if total_severity > SCANDAL_ESCALATION_THRESHOLD
            || open_fines >= FINE_INVESTIGATION_COUNT
            || !started_investigation_reasons.is_empty()
        {
            RegulatoryStatus::UnderInvestigation
        } else if open_fines >= 1 {
            RegulatoryStatus::Warning
        } else {
            RegulatoryStatus::Normal
        };

        // InvestigationStarted already moves status mechanically
        let investigation_implied = !started_investigation_reasons.is_empty();
        if desired.rank() > state.regulatory_status.rank()
            && !(investigation_implied && desired == RegulatoryStatus::UnderInvestigation)
        {
            drafts.push(EventDraft::own(EventPayload::RegulatoryStatusUpdated(
                RegulatoryStatusUpdated {
                    new_status: desired,
                    reason: status_reason(desired),
                },
            )));
        }

        drafts
    }

    /// Whether an equivalent finding is neither pending nor issued this pass
    fn fresh_finding(&self, state: &AgentState, issued: &[String], description: &str) -> bool {
        !state
            .pending_fines
            .iter()
            .any(|f| f.description == description)
            && !issued.iter().any(|d| d == description)
    }

    /// Whether an equivalent investigation is neither open nor started this
    /// pass
    fn fresh_investigation(&self, state: &AgentState, started: &[String], reason: &str) -> bool {
        !state
            .active_investigations
            .values()
            .any(|i| i.reason == reason)
            && !started.iter().any(|r| r == reason)
    }

    /// Messages sent to `recipient` within the recent window, counting both
    /// history and this execution's new events
    fn communication_count(
        &self,
        state: &AgentState,
        history: &[GameEvent],
        new_events: &[GameEvent],
        recipient: &str,
    ) -> usize {
        let window_start = state
            .current_week
            .saturating_sub(COLLUSION_WINDOW_WEEKS);
        history
            .iter()
            .chain(new_events.iter())
            .filter(|e| e.week >= window_start)
            .filter(|e| match &e.payload {
                EventPayload::CommunicationSent(c) => c.recipient_agent_id == recipient,
                _ => false,
            })
            .count()
    }
}

fn finding(description: String, amount: f64, due_week: u32) -> EventDraft {
    EventDraft::own(EventPayload::RegulatoryFinding(RegulatoryFinding {
        fine_id: Uuid::new_v4().to_string(),
        description,
        fine_amount: amount,
        due_week,
    }))
}

fn investigation(reason: String, severity: &str) -> EventDraft {
    EventDraft::own(EventPayload::InvestigationStarted(InvestigationStarted {
        investigation_id: Uuid::new_v4().to_string(),
        reason,
        severity: severity.to_string(),
    }))
}

fn status_reason(status: RegulatoryStatus) -> String {
    match status {
        RegulatoryStatus::Normal => "Normal operations".to_string(),
        RegulatoryStatus::Warning => "Compliance concerns raised".to_string(),
        RegulatoryStatus::UnderInvestigation => {
            "Multiple compliance violations detected".to_string()
        }
        RegulatoryStatus::Penalized => "Sustained pattern of violations".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CommunicationSent, PriceSet, WageAdjusted};
    use crate::state::{CommunicationChannel, Fine, FineStatus, ServiceKind};

    fn regulator() -> Regulator {
        Regulator::new(EngineConfig::default())
    }

    fn price_event(price: f64) -> GameEvent {
        GameEvent::seal(
            "P001",
            0,
            0,
            None,
            EventPayload::PriceSet(PriceSet {
                location_id: "LOC_001".to_string(),
                service: ServiceKind::StandardWash,
                new_price: price,
            }),
        )
    }

    #[test]
    fn test_predatory_price_draws_finding_and_warning() {
        let state = AgentState::zero("P001");
        let drafts = regulator().review(&state, &[], &[price_event(0.10)]);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].payload.kind(), "RegulatoryFinding");
        let EventPayload::RegulatoryStatusUpdated(status) = &drafts[1].payload else {
            panic!("expected status update");
        };
        assert_eq!(status.new_status, RegulatoryStatus::Warning);
    }

    #[test]
    fn test_fair_price_passes_clean() {
        let state = AgentState::zero("P001");
        let drafts = regulator().review(&state, &[], &[price_event(3.75)]);
        assert!(drafts.is_empty());
    }

    #[test]
    fn test_identical_finding_is_not_reissued() {
        let mut state = AgentState::zero("P001");
        state.pending_fines.push(Fine {
            fine_id: "F1".to_string(),
            description: "Predatory pricing on StandardWash at LOC_001".to_string(),
            amount: 500.0,
            issued_week: 0,
            due_week: 4,
            status: FineStatus::Open,
        });
        state.regulatory_status = RegulatoryStatus::Warning;

        // Replaying the same trigger adds no second consequence set
        let drafts = regulator().review(&state, &[], &[price_event(0.10)]);
        assert!(drafts.is_empty());
    }

    #[test]
    fn test_sub_minimum_wage_is_a_labor_violation() {
        let state = AgentState::zero("P001");
        let event = GameEvent::seal(
            "P001",
            0,
            0,
            None,
            EventPayload::WageAdjusted(WageAdjusted {
                location_id: "LOC_001".to_string(),
                staff_id: "S1".to_string(),
                old_rate: 9.0,
                new_rate: 5.0,
            }),
        );
        let drafts = regulator().review(&state, &[], &[event]);
        assert_eq!(drafts[0].payload.kind(), "RegulatoryFinding");
        let EventPayload::RegulatoryFinding(finding) = &drafts[0].payload else {
            panic!("expected finding");
        };
        assert_eq!(finding.fine_amount, 1_500.0);
    }

    #[test]
    fn test_long_message_opens_collusion_investigation() {
        let state = AgentState::zero("P001");
        let event = GameEvent::seal(
            "P001",
            0,
            0,
            None,
            EventPayload::CommunicationSent(CommunicationSent {
                recipient_agent_id: "P002".to_string(),
                channel: CommunicationChannel::Direct,
                message: "x".repeat(400),
            }),
        );
        let drafts = regulator().review(&state, &[], &[event]);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].payload.kind(), "InvestigationStarted");
    }

    #[test]
    fn test_frequent_short_messages_also_trigger() {
        let state = AgentState::zero("P001");
        let message = |text: &str| {
            GameEvent::seal(
                "P001",
                0,
                0,
                None,
                EventPayload::CommunicationSent(CommunicationSent {
                    recipient_agent_id: "P002".to_string(),
                    channel: CommunicationChannel::Direct,
                    message: text.to_string(),
                }),
            )
        };
        let history = vec![message("lunch?"), message("thoughts on pricing?")];
        let drafts = regulator().review(&state, &history, &[message("same again next week")]);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].payload.kind(), "InvestigationStarted");
    }

    #[test]
    fn test_scandal_escalation_tightens_status() {
        let mut state = AgentState::zero("P001");
        for (id, severity) in [("SC1", 0.7), ("SC2", 0.6)] {
            state.active_scandals.push(crate::state::ScandalMarker {
                scandal_id: id.to_string(),
                description: "trouble".to_string(),
                severity,
                duration_weeks: 8,
                decay_rate: 0.1,
                start_week: 0,
            });
        }
        let drafts = regulator().review(&state, &[], &[price_event(3.50)]);
        assert_eq!(drafts.len(), 1);
        let EventPayload::RegulatoryStatusUpdated(status) = &drafts[0].payload else {
            panic!("expected status update");
        };
        assert_eq!(status.new_status, RegulatoryStatus::UnderInvestigation);
    }
}
