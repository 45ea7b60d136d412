use crate::domain::bar::BarSeries;
use crate::domain::snapshot::IndicatorSnapshot;
use crate::screen::assemble::{assemble_snapshot, Rejection, SnapshotOutcome};
use crate::screen::breadth::MarketBreadth;
use crate::screen::zones::{classify, in_buy_zone, in_sell_zone, ZoneClassification};
use crate::universe::Instrument;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct InstrumentSeries {
    pub instrument: Instrument,
    pub series: BarSeries,
}

/// One immutable screening result. Every refresh builds a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub run_id: Uuid,
    pub generation: u64,
    pub generated_at: DateTime<Utc>,
    /// Instruments above SMA-10 first, then by display name.
    pub snapshots: Vec<IndicatorSnapshot>,
    pub rejections: Vec<Rejection>,
}

impl Screen {
    pub fn zones(&self) -> ZoneClassification<'_> {
        classify(&self.snapshots)
    }

    pub fn breadth(&self) -> MarketBreadth {
        MarketBreadth::compute(&self.snapshots, &self.zones())
    }

    pub fn snapshot(&self, symbol_or_name: &str) -> Option<&IndicatorSnapshot> {
        self.snapshots.iter().find(|s| {
            s.symbol.eq_ignore_ascii_case(symbol_or_name)
                || s.name.eq_ignore_ascii_case(symbol_or_name)
        })
    }
}

pub fn refresh(previous: Option<&Screen>, inputs: Vec<InstrumentSeries>) -> Screen {
    refresh_at(previous, inputs, Utc::now())
}

/// Builds a new screen from the current bar series.
///
/// `previous` only contributes the generation counter and the logged zone transitions;
/// every snapshot is recomputed from `inputs`.
pub fn refresh_at(
    previous: Option<&Screen>,
    inputs: Vec<InstrumentSeries>,
    generated_at: DateTime<Utc>,
) -> Screen {
    let mut snapshots = Vec::with_capacity(inputs.len());
    let mut rejections = Vec::new();
    for input in &inputs {
        match assemble_snapshot(&input.instrument, &input.series) {
            SnapshotOutcome::Accepted(s) => snapshots.push(s),
            SnapshotOutcome::Rejected(r) => rejections.push(r),
        }
    }

    snapshots.sort_by(|a, b| {
        b.above_sma10
            .cmp(&a.above_sma10)
            .then_with(|| a.name.cmp(&b.name))
    });

    let screen = Screen {
        run_id: Uuid::new_v4(),
        generation: previous.map_or(1, |p| p.generation + 1),
        generated_at,
        snapshots,
        rejections,
    };

    let breadth = screen.breadth();
    tracing::info!(
        run_id = %screen.run_id,
        generation = screen.generation,
        snapshots = screen.snapshots.len(),
        rejected = screen.rejections.len(),
        buy_zone = breadth.buy_zone,
        sell_zone = breadth.sell_zone,
        "screen refreshed"
    );

    if let Some(previous) = previous {
        let transitions = ZoneTransitions::between(previous, &screen);
        if !transitions.is_empty() {
            tracing::info!(
                entered_buy = ?transitions.entered_buy,
                left_buy = ?transitions.left_buy,
                entered_sell = ?transitions.entered_sell,
                left_sell = ?transitions.left_sell,
                "zone membership changed"
            );
        }
    }

    screen
}

/// Symbols that moved into or out of each zone between two screens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneTransitions {
    pub entered_buy: Vec<String>,
    pub left_buy: Vec<String>,
    pub entered_sell: Vec<String>,
    pub left_sell: Vec<String>,
}

impl ZoneTransitions {
    pub fn between(previous: &Screen, current: &Screen) -> Self {
        let prev_buy = members(previous, in_buy_zone);
        let cur_buy = members(current, in_buy_zone);
        let prev_sell = members(previous, in_sell_zone);
        let cur_sell = members(current, in_sell_zone);

        Self {
            entered_buy: cur_buy.difference(&prev_buy).cloned().collect(),
            left_buy: prev_buy.difference(&cur_buy).cloned().collect(),
            entered_sell: cur_sell.difference(&prev_sell).cloned().collect(),
            left_sell: prev_sell.difference(&cur_sell).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entered_buy.is_empty()
            && self.left_buy.is_empty()
            && self.entered_sell.is_empty()
            && self.left_sell.is_empty()
    }
}

fn members(screen: &Screen, rule: fn(&IndicatorSnapshot) -> bool) -> BTreeSet<String> {
    screen
        .snapshots
        .iter()
        .filter(|s| rule(s))
        .map(|s| s.symbol.clone())
        .collect()
}
