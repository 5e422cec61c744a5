use std::error::Error;
use std::io::Write;
use std::time::Duration;

use services::{
    AnswerFeedback, AppServices, Notice, QuizSession, SessionError, SessionOptions, TickOutcome,
    WelcomeView,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, timeout};
use tracing::warn;
use wordbottle_core::model::{FinalResult, Preferences, UserId};

type Input = Lines<BufReader<Stdin>>;

/// Upper bound on waiting for pending coin reports at exit.
const REPORT_GRACE: Duration = Duration::from_secs(5);

/// Countdown seconds at or below which every tick is printed.
const LOW_TIME_WARNING: u32 = 5;

enum RoundEnd {
    Finished,
    Left,
}

pub fn stdin_lines() -> Input {
    BufReader::new(tokio::io::stdin()).lines()
}

pub fn print_welcome(view: &WelcomeView) {
    let profile = &view.profile;
    println!("Welcome, {}!", profile.display_name);
    println!("  level: {}", profile.level);
    println!("  coins: {}", profile.coin_balance);
    match profile.remaining_tries {
        Some(tries) => println!("  tries left today: {tries}"),
        None => println!("  tries left today: unknown"),
    }
    if view.practice_mode {
        println!("No tries left: this round is practice and awards no coins.");
    }
}

async fn show_notice(notice: &Notice) {
    println!("! {}", notice.message);
    if let Some(after) = notice.dismiss_after {
        tokio::time::sleep(after).await;
    }
}

/// Options for the next session, decided fresh at every start.
///
/// Practice mode follows the latest profile; a profile that failed to load
/// plays a regular session.
pub fn session_options(view: Option<&WelcomeView>, prefs: &Preferences) -> SessionOptions {
    SessionOptions {
        direction_swap: prefs.direction_swapped,
        practice_mode: view.is_some_and(|view| view.practice_mode),
    }
}

async fn load_profile(services: &AppServices, user: UserId) -> Option<WelcomeView> {
    match services.profiles().load_welcome(user).await {
        Ok(view) => Some(view),
        Err(err) => {
            warn!(%user, error = %err, "profile unavailable");
            None
        }
    }
}

/// Run the Welcome → quiz → result cycle until the player quits or closes input.
///
/// # Errors
///
/// Returns stdin failures and unexpected session errors.
pub async fn play(services: &AppServices, user: UserId) -> Result<(), Box<dyn Error>> {
    let quiz_loop = services.quiz_loop();
    let mut input = stdin_lines();
    let mut reports = Vec::new();

    'welcome: loop {
        let view = load_profile(services, user).await;
        match &view {
            Some(view) => print_welcome(view),
            None => println!("Could not load your stats."),
        }

        println!("Press enter to start, q to quit.");
        match input.next_line().await? {
            Some(line) if line.trim().eq_ignore_ascii_case("q") => break,
            Some(_) => {}
            None => break,
        }

        let prefs = services.preferences().load().await?;
        let options = session_options(view.as_ref(), &prefs);
        let mut session = match quiz_loop.start_session(user, options).await {
            Ok(session) => session,
            Err(err) => {
                show_notice(&err.notice()).await;
                if !err.is_retryable() {
                    println!("Come back tomorrow for more tries.");
                }
                continue;
            }
        };

        loop {
            if let RoundEnd::Left = run_round(&mut session, &mut input, prefs.sound_enabled).await?
            {
                session.go_back();
                println!("Back to the welcome screen.");
                continue 'welcome;
            }

            let finished = quiz_loop.finish(&mut session, user)?;
            print_result(&finished.result);
            reports.extend(finished.report);

            println!("Type r to play again, anything else to go back.");
            let again = matches!(
                input.next_line().await?,
                Some(line) if line.trim().eq_ignore_ascii_case("r")
            );
            if !again {
                session.restart();
                continue 'welcome;
            }

            let view = load_profile(services, user).await;
            let options = session_options(view.as_ref(), &prefs);
            if options.practice_mode {
                println!("No tries left: this round is practice and awards no coins.");
            }
            if let Err(err) = quiz_loop.restart_session(&mut session, user, options).await {
                show_notice(&err.notice()).await;
                continue 'welcome;
            }
        }
    }

    await_reports(reports).await;
    Ok(())
}

async fn run_round(
    session: &mut QuizSession,
    input: &mut Input,
    sound: bool,
) -> Result<RoundEnd, Box<dyn Error>> {
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    ticker.tick().await;

    print_question(session);
    loop {
        tokio::select! {
            _ = ticker.tick() => match session.tick() {
                TickOutcome::Expired => {
                    println!("Time is up!");
                    return Ok(RoundEnd::Finished);
                }
                TickOutcome::Running { remaining } if remaining <= LOW_TIME_WARNING => {
                    println!("  {remaining}s left");
                }
                TickOutcome::Running { .. } | TickOutcome::Ignored => {}
            },
            line = input.next_line() => {
                let Some(line) = line? else {
                    return Ok(RoundEnd::Left);
                };
                let trimmed = line.trim();
                if trimmed.eq_ignore_ascii_case("q") {
                    return Ok(RoundEnd::Left);
                }
                let Ok(choice) = trimmed.parse::<usize>() else {
                    println!("Type an option number, or q to go back.");
                    continue;
                };
                // "0" wraps to an out-of-range index
                match session.submit_answer(choice.wrapping_sub(1)) {
                    Ok(Some(feedback)) => {
                        print_feedback(session, &feedback, sound);
                        if feedback.finished {
                            return Ok(RoundEnd::Finished);
                        }
                        print_question(session);
                    }
                    Ok(None) => return Ok(RoundEnd::Finished),
                    Err(SessionError::InvalidOption { len, .. }) => {
                        println!("Pick a number between 1 and {len}.");
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }
}

fn print_question(session: &QuizSession) {
    let Some(question) = session.current_question() else {
        return;
    };
    let progress = session.progress();
    println!();
    println!(
        "[{}/{}] score {}  time {}s",
        progress.answered + 1,
        progress.total,
        progress.score,
        progress.time_remaining
    );
    println!("{}", question.prompt());
    for (i, option) in question.options().iter().enumerate() {
        println!("  {}. {}", i + 1, option.text);
    }
}

fn print_feedback(session: &QuizSession, feedback: &AnswerFeedback, sound: bool) {
    if sound {
        print!("\x07");
        let _ = std::io::stdout().flush();
    }
    if feedback.correct {
        println!("Correct! {:+}s", feedback.time_delta);
    } else {
        match feedback.correct_index {
            Some(index) => println!("Wrong, it was {}. {:+}s", index + 1, feedback.time_delta),
            None => println!("Wrong. {:+}s", feedback.time_delta),
        }
    }
    if feedback.finished && session.time_remaining() == 0 {
        println!("Out of time!");
    }
}

fn print_result(result: &FinalResult) {
    println!();
    println!("Finished: {} of {} correct.", result.score, result.answered_count);
    if result.practice_mode {
        println!("Practice round: no coins awarded.");
    } else {
        println!("You earned {} coins.", result.final_score);
    }
}

async fn await_reports(reports: Vec<JoinHandle<()>>) {
    for report in reports {
        if timeout(REPORT_GRACE, report).await.is_err() {
            warn!("score report still pending at exit");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use services::{ProfileError, ProfileService, ProfileSource};
    use wordbottle_core::model::UserProfile;

    use super::*;

    /// Hands out one scripted try count per fetch.
    struct TriesSource {
        tries: Mutex<Vec<Option<u32>>>,
    }

    #[async_trait]
    impl ProfileSource for TriesSource {
        async fn fetch_profile(&self, user: UserId) -> Result<UserProfile, ProfileError> {
            let remaining_tries = self.tries.lock().unwrap().remove(0);
            Ok(UserProfile {
                user_id: user,
                display_name: "Ali".into(),
                level: "Beginner".into(),
                coin_balance: 10,
                remaining_tries,
            })
        }
    }

    #[tokio::test]
    async fn reloaded_profile_without_tries_switches_to_practice() {
        let source = Arc::new(TriesSource {
            tries: Mutex::new(vec![Some(1), Some(0)]),
        });
        let profiles = ProfileService::new(source);
        let prefs = Preferences::default().with_direction_swapped(true);
        let user = UserId::new(7);

        let first = profiles.load_welcome(user).await.unwrap();
        let options = session_options(Some(&first), &prefs);
        assert!(!options.practice_mode);
        assert!(options.direction_swap);

        let replay = profiles.load_welcome(user).await.unwrap();
        assert!(session_options(Some(&replay), &prefs).practice_mode);
    }

    #[test]
    fn missing_profile_plays_regular_session() {
        let options = session_options(None, &Preferences::default());
        assert!(!options.practice_mode);
        assert!(!options.direction_swap);
    }
}
