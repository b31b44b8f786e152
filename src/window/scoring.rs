use std::collections::{HashMap, HashSet};

use crate::models::EmotionLabel;

use super::config::WindowConfig;

/// Outcome of evaluating one full window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistressVerdict {
    pub trigger: bool,
    /// Most recent sample in the window, used for the prompt text.
    pub display_label: EmotionLabel,
    pub unique_count: usize,
    pub mode: EmotionLabel,
    pub mode_count: usize,
}

/// Number of distinct labels in `samples`.
pub fn count_unique(samples: &[EmotionLabel]) -> usize {
    samples.iter().collect::<HashSet<_>>().len()
}

/// Most frequent label and its count. On ties the label that reached the top
/// count first while scanning in arrival order wins.
pub fn find_mode(samples: &[EmotionLabel]) -> Option<(EmotionLabel, usize)> {
    let mut counts: HashMap<EmotionLabel, usize> = HashMap::new();
    let mut best: Option<(EmotionLabel, usize)> = None;

    for label in samples {
        let count = counts.entry(*label).or_insert(0);
        *count += 1;
        if best.map_or(true, |(_, top)| *count > top) {
            best = Some((*label, *count));
        }
    }

    best
}

/// Evaluates a window. Distress is signalled when the emotions are too varied
/// (`unique >= unique_threshold`) or when no emotion holds the majority share.
/// Returns `None` only for an empty slice.
pub fn evaluate_window(samples: &[EmotionLabel], config: &WindowConfig) -> Option<DistressVerdict> {
    let display_label = *samples.last()?;
    let (mode, mode_count) = find_mode(samples)?;
    let unique_count = count_unique(samples);

    let majority_floor = samples.len() as f64 * config.majority_ratio;
    let trigger = unique_count >= config.unique_threshold || (mode_count as f64) < majority_floor;

    Some(DistressVerdict {
        trigger,
        display_label,
        unique_count,
        mode,
        mode_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use EmotionLabel::*;

    fn repeat(parts: &[(EmotionLabel, usize)]) -> Vec<EmotionLabel> {
        parts
            .iter()
            .flat_map(|(label, n)| std::iter::repeat(*label).take(*n))
            .collect()
    }

    fn verdict(samples: &[EmotionLabel]) -> DistressVerdict {
        evaluate_window(samples, &WindowConfig::default()).unwrap()
    }

    #[test]
    fn three_distinct_emotions_trigger() {
        let samples = [Happy, Sad, Angry, Happy, Sad, Angry, Happy, Sad, Angry, Happy];
        let v = verdict(&samples);
        assert_eq!(v.unique_count, 3);
        assert!(v.trigger);
        assert_eq!(v.display_label, Happy);
    }

    #[test]
    fn single_emotion_never_triggers() {
        let v = verdict(&[Neutral; 10]);
        assert_eq!(v.unique_count, 1);
        assert_eq!(v.mode_count, 10);
        assert!(!v.trigger);
    }

    #[test]
    fn two_emotions_with_majority_do_not_trigger() {
        let v = verdict(&repeat(&[(Happy, 4), (Sad, 6)]));
        assert_eq!((v.mode, v.mode_count), (Sad, 6));
        assert!(!v.trigger);
    }

    #[test]
    fn even_split_of_two_emotions_does_not_trigger() {
        // 5 is not strictly below half of 10
        let v = verdict(&repeat(&[(Happy, 5), (Sad, 5)]));
        assert_eq!(v.mode_count, 5);
        assert!(!v.trigger);
    }

    #[test]
    fn variety_rule_fires_with_weak_third_emotion() {
        let v = verdict(&repeat(&[(Happy, 4), (Sad, 4), (Neutral, 2)]));
        assert_eq!(v.unique_count, 3);
        assert!(v.trigger);
    }

    #[test]
    fn majority_rule_fires_without_variety_rule() {
        let config = WindowConfig {
            unique_threshold: 5,
            ..WindowConfig::default()
        };
        let samples = repeat(&[(Happy, 4), (Sad, 4), (Neutral, 1), (Angry, 1)]);
        let v = evaluate_window(&samples, &config).unwrap();
        assert_eq!(v.unique_count, 4);
        assert_eq!(v.mode_count, 4);
        assert!(v.trigger);
    }

    #[test]
    fn display_label_is_latest_not_mode() {
        let mut samples = vec![Neutral; 9];
        samples.push(Angry);
        let v = verdict(&samples);
        assert_eq!(v.mode, Neutral);
        assert_eq!(v.display_label, Angry);
    }

    #[test]
    fn mode_tie_goes_to_first_label_to_reach_top_count() {
        // sad appears first, but happy reaches two occurrences first
        assert_eq!(find_mode(&[Sad, Happy, Happy, Sad]), Some((Happy, 2)));
        assert_eq!(find_mode(&[Sad, Happy, Sad, Happy]), Some((Sad, 2)));
    }

    #[test]
    fn empty_window_has_no_verdict() {
        assert!(evaluate_window(&[], &WindowConfig::default()).is_none());
        assert_eq!(find_mode(&[]), None);
    }
}
