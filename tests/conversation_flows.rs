//! Conversation turns routed through the application context.

mod common;

use chrono::NaiveDate;

use common::{world_at, world_with_resolver, OWNER, RATER, SPORT, STRANGER};
use goal_oracle::adapters::memory::{ScriptedMessage, StaticTimezoneResolver};
use goal_oracle::application::handlers::render;
use goal_oracle::domain::dialog::Command;
use goal_oracle::domain::foundation::Timezone;
use goal_oracle::domain::goals::{GoalChoice, NewGoal, PendingRating, Verdict};
use goal_oracle::domain::users::FlowName;
use goal_oracle::ports::{Clock, PeerProfile, PendingRatingRepository};

fn moscow() -> Timezone {
    Timezone::parse("Europe/Moscow").unwrap()
}

#[tokio::test]
async fn registration_resolves_city_timezone() {
    let resolver = StaticTimezoneResolver::new().with_place("Moscow", moscow());
    let world = world_with_resolver("2024-03-01T07:00:00Z", resolver).await;
    world
        .transport
        .set_profile(
            OWNER,
            PeerProfile {
                first_name: "Ann".to_string(),
                last_name: "Lee".to_string(),
                city: "Moscow".to_string(),
            },
        )
        .await;

    let owner = world.register(OWNER).await;

    assert_eq!(owner.timezone, moscow());
    assert_eq!(owner.flow, FlowName::Menu);
    assert_eq!(world.last_text(OWNER).await, render::MAIN_MENU);
}

#[tokio::test]
async fn unknown_city_falls_back_to_default_timezone() {
    let world = world_with_resolver("2024-03-01T07:00:00Z", StaticTimezoneResolver::new()).await;
    world
        .transport
        .set_profile(
            OWNER,
            PeerProfile {
                city: "Atlantis".to_string(),
                ..PeerProfile::default()
            },
        )
        .await;

    let owner = world.register(OWNER).await;

    assert_eq!(owner.timezone, Timezone::default());
}

#[tokio::test]
async fn unregistered_peer_is_prompted_and_stranger_ignored() {
    let world = world_at("2024-03-01T07:00:00Z").await;

    world.app.handle_turn(&ScriptedMessage::text(OWNER, "hello")).await;
    world.app.handle_turn(&ScriptedMessage::text(STRANGER, "hello")).await;

    let prompt = world.transport.last_to(OWNER).await.unwrap();
    assert_eq!(prompt.text, render::REGISTER_PROMPT);
    assert!(prompt.menu.unwrap().find("Ready").is_some());
    assert!(world.transport.sent_to(STRANGER).await.is_empty());
    assert!(world.app.directory.find(STRANGER).await.unwrap().is_none());
}

#[tokio::test]
async fn tasks_menu_returns_to_main_menu() {
    let world = world_at("2024-03-01T07:00:00Z").await;
    world.register(OWNER).await;
    world.tap(OWNER, Command::ToTasks).await;
    assert_eq!(world.user(OWNER).await.flow, FlowName::Tasks);

    world.tap(OWNER, Command::Menu).await;

    assert_eq!(world.user(OWNER).await.flow, FlowName::Menu);
    assert_eq!(world.last_text(OWNER).await, render::MAIN_MENU);
}

#[tokio::test]
async fn blank_goal_text_is_prompted_again() {
    let world = world_at("2024-03-01T07:00:00Z").await;
    world.register(OWNER).await;
    world.tap(OWNER, Command::ToTasks).await;
    let date = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
    world
        .tap(
            OWNER,
            Command::ChangeType {
                goal_type: SPORT,
                date,
            },
        )
        .await;

    world.type_text(OWNER, "   ").await;
    assert_eq!(world.last_text(OWNER).await, render::TYPE_GOAL);
    assert!(world.user_goals.all().await.is_empty());

    world.type_text(OWNER, "yoga").await;
    assert_eq!(world.user_goals.all().await.len(), 1);
}

#[tokio::test]
async fn empty_day_shows_every_category_unplanned() {
    let world = world_at("2024-03-01T07:00:00Z").await;
    world.register(OWNER).await;
    world.tap(OWNER, Command::ToTasks).await;

    world
        .tap(
            OWNER,
            Command::ObserveDate {
                date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            },
        )
        .await;

    let text = world.last_text(OWNER).await;
    assert!(text.contains("Wake up\n 📍 Not planned"));
    assert!(text.contains("Sport\n 📍 Not planned"));
}

#[tokio::test]
async fn approval_is_recorded_without_notifying_the_owner() {
    let world = world_at("2024-03-01T07:00:00Z").await;
    let owner = world.register(OWNER).await;
    world.register(RATER).await;
    let binding = world
        .app
        .assignments
        .assign_goal(
            &owner,
            GoalChoice::New(NewGoal::new(SPORT, "swim 1km").unwrap()),
            world.clock.now(),
        )
        .await
        .unwrap();
    world
        .pending
        .put(&PendingRating {
            rater: RATER,
            user_goal: binding.id,
        })
        .await
        .unwrap();
    world.transport.clear().await;

    world.tap(RATER, Command::ToRate).await;
    let review = world.transport.last_to(RATER).await.unwrap();
    assert!(review.text.contains("🙍‍♂ - 303"));
    assert!(review.text.contains("March 1"));
    assert!(review.text.contains("swim 1km"));

    world.tap(RATER, Command::Approve { user_goal: binding.id }).await;

    let votes = world.evaluations.all().await;
    assert_eq!(votes.len(), 1);
    assert!(votes[0].approved);
    assert_eq!(world.app.ratings.verdict(binding.id).await.unwrap(), Verdict::Pass);
    assert_eq!(world.app.flush_queues().await, 0);
    assert!(world.transport.sent_to(OWNER).await.is_empty());
}

#[tokio::test]
async fn repeated_disapproval_reaches_owner_once() {
    let world = world_at("2024-03-01T07:00:00Z").await;
    let owner = world.register(OWNER).await;
    let rater = world.register(RATER).await;
    let binding = world
        .app
        .assignments
        .assign_goal(
            &owner,
            GoalChoice::New(NewGoal::new(SPORT, "swim 1km").unwrap()),
            world.clock.now(),
        )
        .await
        .unwrap();
    world
        .pending
        .put(&PendingRating {
            rater: rater.id,
            user_goal: binding.id,
        })
        .await
        .unwrap();
    world.tap(RATER, Command::ToRate).await;
    world.transport.clear().await;

    for _ in 0..2 {
        world.tap(RATER, Command::Disapprove { user_goal: binding.id }).await;
    }
    world.app.flush_queues().await;

    let to_owner = world.transport.sent_to(OWNER).await;
    assert_eq!(to_owner.len(), 1);
    assert!(to_owner[0].text.starts_with("Your goal was marked as invalid"));
    assert_eq!(world.app.ratings.verdict(binding.id).await.unwrap(), Verdict::Fail);
}
