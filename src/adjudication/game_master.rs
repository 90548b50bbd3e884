// Copyright 2025 Cowboy AI, LLC.

//! Game master: narrative and market orchestration
//!
//! Reads state snapshots at well-defined hooks and injects world events:
//! customer reviews, vendor price drift, delivery disruptions, NPC
//! competitor moves, and dilemmas from a fixed catalog. All randomness comes
//! from a PRNG seeded by (agent id, week, day, hook), so replaying a log
//! reproduces the same narrative.

use crate::events::{
    CompetitorPriceChanged, CustomerReviewSubmitted, DeliveryDisruptionEnded,
    DeliveryDisruptionStarted, DilemmaTriggered, EventDraft, EventPayload, VendorPriceFluctuated,
};
use crate::state::{AgentState, DilemmaOption, DisruptionKind, LocationState, ServiceKind};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// NPC competitor used by the market model
const NPC_COMPETITOR_ID: &str = "NPC_SUDSCO";

/// Cash level that triggers the cost-cutting dilemma
const CASH_CRUNCH_THRESHOLD: f64 = 1_000.0;
/// Scandal severity that triggers the PR dilemma
const PR_CRISIS_THRESHOLD: f64 = 0.4;

/// Where in the engine cycle the game master is observing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjudicationHook {
    /// After a player command was applied
    PostCommand,
    /// After a time advance was applied
    PostTick,
}

/// Observes snapshots and injects narrative events; never mutates state.
#[derive(Debug, Clone, Default)]
pub struct GameMaster;

impl GameMaster {
    /// Create a game master
    pub fn new() -> Self {
        Self
    }

    /// Observe a snapshot and propose narrative events.
    pub fn observe(&self, state: &AgentState, hook: AdjudicationHook) -> Vec<EventDraft> {
        let mut drafts = Vec::new();

        // Dilemmas fire on deterministic predicates at both hooks
        self.trigger_dilemmas(state, &mut drafts);

        if hook != AdjudicationHook::PostTick {
            return drafts;
        }

        let mut rng = SmallRng::seed_from_u64(replay_seed(
            &state.agent_id,
            state.current_week,
            state.current_day,
            1,
        ));

        for (location_id, location) in &state.locations {
            if rng.gen_bool(0.30) {
                drafts.push(customer_review(location_id, location));
            }
            if rng.gen_bool(0.25) {
                drafts.push(competitor_move(location_id, location, &mut rng));
            }
            if let Some(vendor_id) = pick_vendor(location, &mut rng) {
                if rng.gen_bool(0.20) {
                    let rel = &location.vendor_relationships[&vendor_id];
                    let factor = 0.9 + rng.gen_range(0.0..0.2);
                    drafts.push(EventDraft::own(EventPayload::VendorPriceFluctuated(
                        VendorPriceFluctuated {
                            vendor_id: vendor_id.clone(),
                            old_price_per_unit: rel.current_unit_price,
                            new_price_per_unit: rel.current_unit_price * factor,
                        },
                    )));
                }
                let rel = &location.vendor_relationships[&vendor_id];
                if rel.disrupted {
                    if rng.gen_bool(0.50) {
                        drafts.push(EventDraft::own(EventPayload::DeliveryDisruptionEnded(
                            DeliveryDisruptionEnded { vendor_id },
                        )));
                    }
                } else if rng.gen_bool(0.10) {
                    let disruption = match rng.gen_range(0..3) {
                        0 => DisruptionKind::Delay,
                        1 => DisruptionKind::PartialShipment,
                        _ => DisruptionKind::QualityIssue,
                    };
                    drafts.push(EventDraft::own(EventPayload::DeliveryDisruptionStarted(
                        DeliveryDisruptionStarted {
                            vendor_id,
                            disruption,
                            impact_description: disruption_copy(disruption).to_string(),
                        },
                    )));
                }
            }
        }

        drafts
    }

    fn trigger_dilemmas(&self, state: &AgentState, drafts: &mut Vec<EventDraft>) {
        if state.cash_balance < CASH_CRUNCH_THRESHOLD
            && !state.active_dilemmas.contains_key("cash_crunch")
        {
            drafts.push(dilemma(
                "cash_crunch",
                "You could save $500 a week by skipping safety maintenance. Do it?",
                &[
                    ("cut_corners", "Skip the maintenance", 0.0, -15.0, "HIGH"),
                    (
                        "maintain_standards",
                        "Keep the maintenance schedule",
                        500.0,
                        5.0,
                        "LOW",
                    ),
                ],
            ));
        }
        if state.total_scandal_severity() > PR_CRISIS_THRESHOLD
            && !state.active_dilemmas.contains_key("pr_crisis")
        {
            drafts.push(dilemma(
                "pr_crisis",
                "A journalist offers to bury the story for free laundry. Accept?",
                &[
                    ("accept", "Take the quiet deal", 0.0, -10.0, "HIGH"),
                    ("reject", "Let the story run", 0.0, 5.0, "LOW"),
                ],
            ));
        }
    }
}

/// Stable seed mixer; never hash-map based so replays agree across runs
fn replay_seed(agent_id: &str, week: u32, day: u8, counter: u64) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in agent_id.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash ^= u64::from(week).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    hash ^= u64::from(day).wrapping_mul(0x517C_C1B7_2722_0A95);
    hash ^= counter.wrapping_mul(0x2545_F491_4F6C_DD1D);
    hash ^ (hash >> 33)
}

fn customer_review(location_id: &str, location: &LocationState) -> EventDraft {
    // Quality blends cleanliness and fleet condition; an uncompetitive
    // price knocks half a star off
    let quality =
        0.6 * location.cleanliness + 0.4 * location.average_machine_condition();
    let mut rating = 1.0 + 4.0 * quality / 100.0;
    let own = location
        .active_pricing
        .get(&ServiceKind::StandardWash)
        .copied()
        .unwrap_or(3.50);
    if let Some(competitor) = location
        .observed_competitor_prices
        .get(&ServiceKind::StandardWash)
    {
        if own > *competitor {
            rating -= 0.5;
        }
    }
    let rating = ((rating * 10.0).round() / 10.0).clamp(1.0, 5.0);

    let review_text = match rating as u32 {
        0 | 1 => "Terrible experience, machines were broken.",
        2 => "Not great, place was dirty.",
        3 => "Okay, but could be cleaner.",
        4 => "Good service and clean facilities.",
        _ => "Excellent! Very clean and well-maintained.",
    };

    EventDraft::own(EventPayload::CustomerReviewSubmitted(
        CustomerReviewSubmitted {
            location_id: location_id.to_string(),
            rating,
            review_text: review_text.to_string(),
        },
    ))
}

fn competitor_move(
    location_id: &str,
    location: &LocationState,
    rng: &mut SmallRng,
) -> EventDraft {
    let own = location
        .active_pricing
        .get(&ServiceKind::StandardWash)
        .copied()
        .unwrap_or(3.50);
    let factor = 0.9 + rng.gen_range(0.0..0.2);
    EventDraft::own(EventPayload::CompetitorPriceChanged(
        CompetitorPriceChanged {
            competitor_id: NPC_COMPETITOR_ID.to_string(),
            location_id: location_id.to_string(),
            service: ServiceKind::StandardWash,
            new_price: ((own * factor) * 100.0).round() / 100.0,
        },
    ))
}

fn pick_vendor(location: &LocationState, rng: &mut SmallRng) -> Option<String> {
    if location.vendor_relationships.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..location.vendor_relationships.len());
    location.vendor_relationships.keys().nth(index).cloned()
}

fn disruption_copy(kind: DisruptionKind) -> &'static str {
    match kind {
        DisruptionKind::Delay => "Your order is delayed by 3-5 days due to supplier issues.",
        DisruptionKind::PartialShipment => {
            "Only part of your order arrived; the rest is coming next week."
        }
        DisruptionKind::QualityIssue => {
            "Some detergent arrived contaminated; a replacement was requested."
        }
    }
}

fn dilemma(
    id: &str,
    description: &str,
    options: &[(&str, &str, f64, f64, &str)],
) -> EventDraft {
    let mut map = BTreeMap::new();
    for (key, text, cost, social, risk) in options {
        map.insert(
            key.to_string(),
            DilemmaOption {
                description: text.to_string(),
                immediate_cost: *cost,
                social_score_impact: *social,
                regulatory_risk: risk.to_string(),
            },
        );
    }
    EventDraft::own(EventPayload::DilemmaTriggered(DilemmaTriggered {
        dilemma_id: id.to_string(),
        description: description.to_string(),
        options: map,
    }))
}
