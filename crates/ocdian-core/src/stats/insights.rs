use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::streak::current_streak;
use crate::journal::MoodSample;

pub const DEFAULT_TRIGGER_LIMIT: usize = 5;

/// Label bucket for an average mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodCategory {
    Challenging,
    Struggling,
    Stable,
    Good,
    Excellent,
    Unknown,
}

impl MoodCategory {
    pub fn label(self) -> &'static str {
        match self {
            MoodCategory::Challenging => "Challenging",
            MoodCategory::Struggling => "Struggling",
            MoodCategory::Stable => "Stable",
            MoodCategory::Good => "Good",
            MoodCategory::Excellent => "Excellent",
            MoodCategory::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for MoodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Top `limit` trigger names by number of samples tagged with them.
///
/// Ties are ordered by name so the ranking is stable across runs.
/// Returns `None` when no sample carries any trigger.
pub fn most_common_triggers(samples: &[MoodSample], limit: usize) -> Option<Vec<String>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for trigger in samples.iter().flat_map(|s| s.triggers.iter()) {
        *counts.entry(trigger.as_str()).or_default() += 1;
    }
    if counts.is_empty() {
        return None;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    Some(
        ranked
            .into_iter()
            .take(limit)
            .map(|(name, _)| name.to_string())
            .collect(),
    )
}

/// Number of samples whose trigger set contains `name`.
pub fn trigger_count(samples: &[MoodSample], name: &str) -> usize {
    samples.iter().filter(|s| s.has_trigger(name)).count()
}

/// Mean mood value, `None` for an empty history.
pub fn average_mood(samples: &[MoodSample]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let total: u32 = samples.iter().map(|s| u32::from(s.mood_value.get())).sum();
    Some(f64::from(total) / samples.len() as f64)
}

/// Bucket an average: lower bounds inclusive, `[4.5, 5.0]` closed.
pub fn average_mood_category(avg: f64) -> MoodCategory {
    match avg {
        a if (0.0..1.5).contains(&a) => MoodCategory::Challenging,
        a if (1.5..2.5).contains(&a) => MoodCategory::Struggling,
        a if (2.5..3.5).contains(&a) => MoodCategory::Stable,
        a if (3.5..4.5).contains(&a) => MoodCategory::Good,
        a if (4.5..=5.0).contains(&a) => MoodCategory::Excellent,
        _ => MoodCategory::Unknown,
    }
}

/// Sample with the highest mood; among equals the last one encountered wins.
pub fn best_day(samples: &[MoodSample]) -> Option<&MoodSample> {
    samples.iter().max_by_key(|s| s.mood_value)
}

/// Latest sample by timestamp, regardless of insertion order.
pub fn most_recent(samples: &[MoodSample]) -> Option<&MoodSample> {
    samples.iter().max_by_key(|s| s.timestamp)
}

/// Summary shown on the insights screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub total_samples: usize,
    pub average_mood: Option<f64>,
    pub category: MoodCategory,
    pub top_triggers: Vec<TriggerStat>,
    pub best_day: Option<DateTime<Utc>>,
    pub best_mood: Option<u8>,
    pub current_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerStat {
    pub name: String,
    pub count: usize,
}

impl Insights {
    pub fn compute(samples: &[MoodSample], today: NaiveDate) -> Self {
        let average = average_mood(samples);
        let best = best_day(samples);
        let top_triggers = most_common_triggers(samples, DEFAULT_TRIGGER_LIMIT)
            .unwrap_or_default()
            .into_iter()
            .map(|name| TriggerStat {
                count: trigger_count(samples, &name),
                name,
            })
            .collect();

        Self {
            total_samples: samples.len(),
            average_mood: average,
            category: average
                .map(average_mood_category)
                .unwrap_or(MoodCategory::Unknown),
            top_triggers,
            best_day: best.map(|s| s.timestamp),
            best_mood: best.map(|s| s.mood_value.get()),
            current_streak: current_streak(samples, today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scales::MoodValue;
    use chrono::Duration;

    fn sample(value: u8, triggers: &[&str]) -> MoodSample {
        MoodSample::new(MoodValue::new(value).unwrap(), triggers.iter().copied(), "")
    }

    #[test]
    fn triggers_ranked_by_count() {
        let samples = vec![
            sample(3, &["Stress"]),
            sample(2, &["Stress", "Work"]),
            sample(4, &[]),
        ];
        assert_eq!(
            most_common_triggers(&samples, 5),
            Some(vec!["Stress".to_string(), "Work".to_string()])
        );
        assert_eq!(trigger_count(&samples, "Stress"), 2);
        assert_eq!(trigger_count(&samples, "Family"), 0);
    }

    #[test]
    fn trigger_ties_break_by_name_and_respect_limit() {
        let samples = vec![
            sample(3, &["Work", "Social", "Health"]),
            sample(3, &["Family", "Environment", "Stress"]),
        ];
        assert_eq!(
            most_common_triggers(&samples, 3),
            Some(vec![
                "Environment".to_string(),
                "Family".to_string(),
                "Health".to_string()
            ])
        );
    }

    #[test]
    fn no_triggers_is_none() {
        assert_eq!(most_common_triggers(&[], 5), None);
        assert_eq!(most_common_triggers(&[sample(3, &[])], 5), None);
    }

    #[test]
    fn average_and_category() {
        assert_eq!(average_mood(&[]), None);
        let samples = vec![sample(2, &[]), sample(4, &[]), sample(3, &[])];
        assert_eq!(average_mood(&samples), Some(3.0));

        assert_eq!(average_mood_category(3.0), MoodCategory::Stable);
        assert_eq!(average_mood_category(4.5), MoodCategory::Excellent);
        assert_eq!(average_mood_category(2.5), MoodCategory::Stable);
        assert_eq!(average_mood_category(1.49), MoodCategory::Challenging);
        assert_eq!(average_mood_category(5.0), MoodCategory::Excellent);
        assert_eq!(average_mood_category(5.01), MoodCategory::Unknown);
        assert_eq!(average_mood_category(-1.0), MoodCategory::Unknown);
        assert_eq!(average_mood_category(f64::NAN), MoodCategory::Unknown);
    }

    #[test]
    fn best_day_prefers_last_of_equals() {
        let samples = vec![sample(5, &[]), sample(2, &[]), sample(5, &[])];
        assert_eq!(best_day(&samples).unwrap().id, samples[2].id);
        assert!(best_day(&[]).is_none());
    }

    #[test]
    fn most_recent_ignores_insertion_order() {
        let now = Utc::now();
        let newer = MoodSample::at(now, MoodValue::new(1).unwrap(), Vec::<String>::new(), "");
        let older = MoodSample::at(
            now - Duration::days(3),
            MoodValue::new(5).unwrap(),
            Vec::<String>::new(),
            "",
        );
        let samples = vec![newer.clone(), older];
        assert_eq!(most_recent(&samples).unwrap().id, newer.id);
    }

    #[test]
    fn insights_summary() {
        let samples = vec![sample(4, &["Work"]), sample(5, &["Work", "Stress"])];
        let today = chrono::Local::now().date_naive();
        let insights = Insights::compute(&samples, today);
        assert_eq!(insights.total_samples, 2);
        assert_eq!(insights.average_mood, Some(4.5));
        assert_eq!(insights.category, MoodCategory::Excellent);
        assert_eq!(insights.top_triggers[0], TriggerStat { name: "Work".into(), count: 2 });
        assert_eq!(insights.best_mood, Some(5));
        assert_eq!(insights.current_streak, 1);
    }
}
