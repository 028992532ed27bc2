use std::collections::BTreeMap;

use crate::models::lesson::Lesson;
use crate::models::progress::{DifficultyProgress, LastAccessedLesson, ProgressStats, UserProgress};
use crate::models::quiz_attempt::AttemptView;
use crate::models::stats::{DifficultyStats, RecentAttempt, StatsSummary, TopicStats};

pub const RECENT_ATTEMPTS_LIMIT: usize = 10;
const UNKNOWN_GROUP: &str = "Unknown";

/// Aggregates quiz attempt history and lesson progress into dashboard
/// statistics.
pub struct StatsService;

#[derive(Debug, Default)]
struct GroupTally {
    attempts: u32,
    correct: u32,
}

impl GroupTally {
    fn accuracy(&self) -> f64 {
        f64::from(self.correct) / f64::from(self.attempts) * 100.0
    }
}

impl StatsService {
    /// Summarize attempts ordered newest first.
    ///
    /// Defined for every input: an empty history yields the zeroed summary.
    pub fn summarize(attempts: &[AttemptView]) -> StatsSummary {
        if attempts.is_empty() {
            return StatsSummary::default();
        }

        let total_attempts = attempts.len() as u32;
        let correct_answers = attempts.iter().filter(|a| a.attempt.is_correct).count() as u32;
        let total_time_practicing: i64 = attempts
            .iter()
            .map(|a| i64::from(a.attempt.time_taken))
            .sum();

        let accuracy_rate = f64::from(correct_answers) / f64::from(total_attempts) * 100.0;
        let average_time_taken = total_time_practicing as f64 / f64::from(total_attempts);

        let stats_by_topic = group_by(attempts, |a| a.topic.as_deref())
            .into_iter()
            .map(|(topic, tally)| TopicStats {
                accuracy: tally.accuracy(),
                topic,
                attempts: tally.attempts,
                correct: tally.correct,
            })
            .collect();

        let stats_by_difficulty = group_by(attempts, |a| a.difficulty.as_deref())
            .into_iter()
            .map(|(difficulty, tally)| DifficultyStats {
                accuracy: tally.accuracy(),
                difficulty,
                attempts: tally.attempts,
                correct: tally.correct,
            })
            .collect();

        let recent_attempts = attempts
            .iter()
            .take(RECENT_ATTEMPTS_LIMIT)
            .map(recent_view)
            .collect();

        StatsSummary {
            total_attempts,
            correct_answers,
            incorrect_answers: total_attempts - correct_answers,
            accuracy_rate: round2(accuracy_rate),
            average_time_taken: round2(average_time_taken),
            total_time_practicing,
            stats_by_topic,
            stats_by_difficulty,
            recent_attempts,
            perfect_score_streak: perfect_score_streak(attempts),
        }
    }

    /// Summarize a user's lesson progress against the full lesson catalogue.
    ///
    /// Rates and the average are whole percentages; an empty catalogue or
    /// an empty progress list yields zeros rather than dividing.
    pub fn summarize_progress(lessons: &[Lesson], progress: &[UserProgress]) -> ProgressStats {
        let total_lessons = lessons.len() as u32;
        let completed_lessons = progress.iter().filter(|p| p.completed).count() as u32;
        let in_progress_lessons = progress.iter().filter(|p| is_in_progress(p)).count() as u32;

        let average_progress = if progress.is_empty() {
            0
        } else {
            let sum: i64 = progress.iter().map(|p| i64::from(p.progress)).sum();
            (sum as f64 / progress.len() as f64).round() as i64
        };

        let last_accessed_lesson = latest_access(progress).and_then(|latest| {
            lessons
                .iter()
                .find(|l| l.id == latest.lesson_id)
                .map(|lesson| LastAccessedLesson {
                    lesson: lesson.clone(),
                    progress: latest.progress,
                    completed: latest.completed,
                    last_accessed: latest.last_accessed,
                })
        });

        let mut progress_by_difficulty: BTreeMap<String, DifficultyProgress> = BTreeMap::new();
        for lesson in lessons {
            progress_by_difficulty
                .entry(lesson.difficulty.clone())
                .or_default()
                .total += 1;
        }
        for row in progress {
            let Some(lesson) = lessons.iter().find(|l| l.id == row.lesson_id) else {
                continue;
            };
            if let Some(group) = progress_by_difficulty.get_mut(&lesson.difficulty) {
                if row.completed {
                    group.completed += 1;
                } else if row.progress > 0 {
                    group.in_progress += 1;
                }
            }
        }
        for group in progress_by_difficulty.values_mut() {
            group.not_started = group
                .total
                .saturating_sub(group.completed + group.in_progress);
            group.completion_rate = whole_percent(group.completed, group.total);
        }

        ProgressStats {
            total_lessons,
            completed_lessons,
            in_progress_lessons,
            not_started_lessons: total_lessons
                .saturating_sub(completed_lessons + in_progress_lessons),
            average_progress,
            overall_completion_rate: whole_percent(completed_lessons, total_lessons),
            last_accessed_lesson,
            progress_by_difficulty,
        }
    }
}

fn is_in_progress(row: &UserProgress) -> bool {
    row.progress > 0 && !row.completed
}

fn whole_percent(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(total) * 100.0).round() as u32
}

/// Most recently accessed row; the earliest listed wins a tie.
fn latest_access(progress: &[UserProgress]) -> Option<&UserProgress> {
    progress.iter().fold(None, |latest: Option<&UserProgress>, row| match latest {
        Some(best) if best.last_accessed >= row.last_accessed => Some(best),
        _ => Some(row),
    })
}

/// Consecutive correct attempts counted from the most recent one.
pub fn perfect_score_streak(attempts: &[AttemptView]) -> u32 {
    attempts
        .iter()
        .take_while(|a| a.attempt.is_correct)
        .count() as u32
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Groups in order of first occurrence; missing keys fall into "Unknown".
fn group_by<'a, F>(attempts: &'a [AttemptView], key: F) -> Vec<(String, GroupTally)>
where
    F: Fn(&'a AttemptView) -> Option<&'a str>,
{
    let mut groups: Vec<(String, GroupTally)> = Vec::new();
    for attempt in attempts {
        let name = key(attempt).unwrap_or(UNKNOWN_GROUP);
        let idx = match groups.iter().position(|(g, _)| g == name) {
            Some(idx) => idx,
            None => {
                groups.push((name.to_string(), GroupTally::default()));
                groups.len() - 1
            }
        };
        let tally = &mut groups[idx].1;
        tally.attempts += 1;
        if attempt.attempt.is_correct {
            tally.correct += 1;
        }
    }
    groups
}

fn recent_view(view: &AttemptView) -> RecentAttempt {
    RecentAttempt {
        id: view.attempt.id,
        quiz_question_id: view.attempt.quiz_question_id,
        question: view.question.clone(),
        options: view.options.clone(),
        user_answer: view.attempt.user_answer,
        correct_answer: view.correct_answer,
        is_correct: view.attempt.is_correct,
        time_taken: view.attempt.time_taken,
        explanation: view.explanation.clone(),
        topic: view.topic.clone(),
        difficulty: view.difficulty.clone(),
        created_at: view.attempt.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz_attempt::QuizAttempt;
    use chrono::{Duration, TimeZone, Utc};

    fn attempt(id: i64, correct: bool, time: i32, topic: Option<&str>, difficulty: Option<&str>) -> AttemptView {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        AttemptView {
            attempt: QuizAttempt {
                id,
                user_id: "user-1".into(),
                quiz_question_id: 100 + id,
                user_answer: if correct { 1 } else { 0 },
                is_correct: correct,
                time_taken: time,
                created_at: base - Duration::minutes(id),
            },
            question: Some(format!("Question {}", id)),
            options: None,
            correct_answer: Some(1),
            explanation: Some("because".into()),
            topic: topic.map(String::from),
            difficulty: difficulty.map(String::from),
        }
    }

    fn history(pattern: &[bool]) -> Vec<AttemptView> {
        pattern
            .iter()
            .enumerate()
            .map(|(i, c)| attempt(i as i64 + 1, *c, 10, Some("addition"), Some("Beginner")))
            .collect()
    }

    #[test]
    fn empty_history_is_all_zero() {
        let stats = StatsService::summarize(&[]);
        assert_eq!(stats, StatsSummary::default());
        assert_eq!(stats.accuracy_rate, 0.0);
        assert!(stats.stats_by_topic.is_empty());
        assert!(stats.recent_attempts.is_empty());
        assert_eq!(stats.perfect_score_streak, 0);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalAttempts"], 0);
        assert_eq!(json["statsByDifficulty"], serde_json::json!([]));
    }

    #[test]
    fn streak_stops_at_first_incorrect_attempt() {
        let stats = StatsService::summarize(&history(&[true, true, false, true]));
        assert_eq!(stats.perfect_score_streak, 2);
    }

    #[test]
    fn streak_covers_whole_history_when_all_correct() {
        assert_eq!(StatsService::summarize(&history(&[true; 7])).perfect_score_streak, 7);
        assert_eq!(StatsService::summarize(&history(&[false; 4])).perfect_score_streak, 0);
        assert_eq!(StatsService::summarize(&history(&[false, true, true])).perfect_score_streak, 0);
    }

    #[test]
    fn counts_add_up_and_accuracy_is_bounded() {
        let patterns: [&[bool]; 4] = [
            &[true],
            &[false],
            &[true, false, true, true, false],
            &[false, false, true],
        ];
        for pattern in patterns {
            let stats = StatsService::summarize(&history(pattern));
            assert_eq!(stats.correct_answers + stats.incorrect_answers, stats.total_attempts);
            assert!((0.0..=100.0).contains(&stats.accuracy_rate));
            assert_eq!(stats.accuracy_rate == 0.0, stats.correct_answers == 0);
            assert_eq!(
                stats.accuracy_rate == 100.0,
                stats.correct_answers == stats.total_attempts
            );
        }
    }

    #[test]
    fn top_level_rates_are_rounded_to_two_places() {
        let attempts = vec![
            attempt(1, true, 10, Some("addition"), Some("Beginner")),
            attempt(2, true, 11, Some("addition"), Some("Beginner")),
            attempt(3, false, 11, Some("addition"), Some("Beginner")),
        ];
        let stats = StatsService::summarize(&attempts);
        assert_eq!(stats.accuracy_rate, 66.67);
        assert_eq!(stats.average_time_taken, 10.67);
        assert_eq!(stats.total_time_practicing, 32);
    }

    #[test]
    fn group_accuracy_is_left_unrounded() {
        let attempts = vec![
            attempt(1, true, 5, Some("addition"), Some("Beginner")),
            attempt(2, true, 5, Some("addition"), Some("Beginner")),
            attempt(3, false, 5, Some("addition"), Some("Beginner")),
        ];
        let stats = StatsService::summarize(&attempts);
        let expected = 2.0 / 3.0 * 100.0;
        assert_eq!(stats.stats_by_topic[0].accuracy, expected);
        assert_ne!(stats.stats_by_topic[0].accuracy, stats.accuracy_rate);
    }

    #[test]
    fn groups_keep_first_seen_order_and_unknown_bucket() {
        let attempts = vec![
            attempt(1, true, 5, Some("subtraction"), Some("Advanced")),
            attempt(2, false, 5, None, Some("Beginner")),
            attempt(3, true, 5, Some("addition"), None),
            attempt(4, true, 5, Some("subtraction"), Some("Advanced")),
        ];
        let stats = StatsService::summarize(&attempts);

        let topics: Vec<&str> = stats.stats_by_topic.iter().map(|t| t.topic.as_str()).collect();
        assert_eq!(topics, ["subtraction", "Unknown", "addition"]);
        assert_eq!(stats.stats_by_topic[0].attempts, 2);
        assert_eq!(stats.stats_by_topic[0].correct, 2);
        assert_eq!(stats.stats_by_topic[1].accuracy, 0.0);

        let difficulties: Vec<&str> = stats
            .stats_by_difficulty
            .iter()
            .map(|d| d.difficulty.as_str())
            .collect();
        assert_eq!(difficulties, ["Advanced", "Beginner", "Unknown"]);

        let total: u32 = stats.stats_by_topic.iter().map(|t| t.attempts).sum();
        assert_eq!(total, stats.total_attempts);
    }

    #[test]
    fn recent_attempts_are_capped_and_keep_input_order() {
        let attempts: Vec<AttemptView> = (1..=15)
            .map(|i| attempt(i, i % 2 == 0, 3, Some("division"), Some("Intermediate")))
            .collect();
        let stats = StatsService::summarize(&attempts);
        assert_eq!(stats.recent_attempts.len(), RECENT_ATTEMPTS_LIMIT);
        let ids: Vec<i64> = stats.recent_attempts.iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<i64>>());
        assert_eq!(stats.recent_attempts[0].quiz_question_id, 101);
        assert_eq!(stats.recent_attempts[0].topic.as_deref(), Some("division"));
    }

    fn lesson(id: i64, difficulty: &str) -> Lesson {
        Lesson {
            id,
            title: format!("Lesson {}", id),
            description: None,
            duration: "15 min".into(),
            difficulty: difficulty.into(),
            order_index: id as i32,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn progress_row(lesson_id: i64, progress: i32, completed: bool, minutes_ago: i64) -> UserProgress {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        UserProgress {
            id: lesson_id * 10,
            user_id: "user-1".into(),
            lesson_id,
            progress,
            completed,
            last_accessed: now - Duration::minutes(minutes_ago),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_catalogue_has_zero_completion_rate() {
        let stats = StatsService::summarize_progress(&[], &[]);
        assert_eq!(stats, ProgressStats::default());
        assert_eq!(stats.overall_completion_rate, 0);
        assert!(stats.progress_by_difficulty.is_empty());

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json["lastAccessedLesson"].is_null());
        assert_eq!(json["progressByDifficulty"], serde_json::json!({}));
    }

    #[test]
    fn no_progress_rows_means_everything_not_started() {
        let lessons = [lesson(1, "Beginner"), lesson(2, "Advanced")];
        let stats = StatsService::summarize_progress(&lessons, &[]);
        assert_eq!(stats.total_lessons, 2);
        assert_eq!(stats.average_progress, 0);
        assert_eq!(stats.not_started_lessons, 2);
        assert_eq!(stats.overall_completion_rate, 0);
        assert!(stats.last_accessed_lesson.is_none());
        assert_eq!(stats.progress_by_difficulty["Advanced"].not_started, 1);
    }

    #[test]
    fn progress_is_split_into_completed_in_progress_and_not_started() {
        let lessons = [
            lesson(1, "Beginner"),
            lesson(2, "Beginner"),
            lesson(3, "Intermediate"),
            lesson(4, "Advanced"),
        ];
        let rows = [
            progress_row(1, 100, true, 30),
            progress_row(2, 50, false, 5),
            progress_row(3, 0, false, 60),
        ];
        let stats = StatsService::summarize_progress(&lessons, &rows);

        assert_eq!(stats.completed_lessons, 1);
        assert_eq!(stats.in_progress_lessons, 1);
        assert_eq!(stats.not_started_lessons, 2);
        assert_eq!(stats.average_progress, 50);
        assert_eq!(stats.overall_completion_rate, 25);

        let beginner = stats.progress_by_difficulty["Beginner"];
        assert_eq!(
            beginner,
            DifficultyProgress {
                total: 2,
                completed: 1,
                in_progress: 1,
                not_started: 0,
                completion_rate: 50,
            }
        );
        assert_eq!(stats.progress_by_difficulty["Intermediate"].not_started, 1);

        let last = stats.last_accessed_lesson.unwrap();
        assert_eq!(last.lesson.id, 2);
        assert_eq!(last.progress, 50);
        assert!(!last.completed);
    }

    #[test]
    fn progress_figures_round_to_whole_percentages() {
        let lessons = [lesson(1, "Beginner"), lesson(2, "Beginner"), lesson(3, "Beginner")];
        let rows = [progress_row(1, 100, true, 1), progress_row(2, 35, false, 1)];
        let stats = StatsService::summarize_progress(&lessons, &rows);
        assert_eq!(stats.average_progress, 68);
        assert_eq!(stats.overall_completion_rate, 33);
        // Equal timestamps keep the first row.
        assert_eq!(stats.last_accessed_lesson.unwrap().lesson.id, 1);
    }
}
