use async_trait::async_trait;
use storefront_api::storefront::session::{
    Session, SessionGate, SessionHub, SessionProvider, SessionSubscription,
};
use tokio::sync::watch;
use uuid::Uuid;

fn session(email: &str) -> Session {
    Session {
        user_id: Uuid::new_v4(),
        email: email.to_string(),
        access_token: "token".to_string(),
    }
}

#[tokio::test]
async fn starts_signed_out_without_session() {
    let hub = SessionHub::new();
    let gate = SessionGate::start(&hub).await;

    assert!(!gate.is_authenticated());
    assert_eq!(gate.current(), None);
}

#[tokio::test]
async fn picks_up_existing_session_on_start() {
    let hub = SessionHub::new();
    let signed_in = session("ama@example.com");
    hub.publish(signed_in.clone());

    let gate = SessionGate::start(&hub).await;

    assert!(gate.is_authenticated());
    assert_eq!(gate.current(), Some(signed_in));
}

#[tokio::test]
async fn follows_sign_in_and_sign_out() {
    let hub = SessionHub::new();
    let gate = SessionGate::start(&hub).await;
    let mut view = gate.watch();

    hub.publish(session("kofi@example.com"));
    view.wait_for(Option::is_some).await.unwrap();
    assert!(gate.is_authenticated());
    assert_eq!(gate.current().unwrap().email, "kofi@example.com");

    hub.clear();
    view.wait_for(Option::is_none).await.unwrap();
    assert!(!gate.is_authenticated());
}

/// Provider whose session changes between `subscribe` and `current_session`.
struct RacingProvider {
    tx: watch::Sender<Option<Session>>,
    late: Session,
}

#[async_trait]
impl SessionProvider for RacingProvider {
    async fn current_session(&self) -> Option<Session> {
        let initial = self.tx.borrow().clone();
        self.tx.send_replace(Some(self.late.clone()));
        initial
    }

    fn subscribe(&self) -> SessionSubscription {
        SessionSubscription::new(self.tx.subscribe())
    }
}

#[tokio::test]
async fn change_during_initial_fetch_is_not_lost() {
    let (tx, _rx) = watch::channel(None);
    let late = session("late@example.com");
    let provider = RacingProvider {
        tx,
        late: late.clone(),
    };

    let gate = SessionGate::start(&provider).await;
    let mut view = gate.watch();
    view.wait_for(Option::is_some).await.unwrap();

    assert_eq!(gate.current(), Some(late));
}

#[tokio::test]
async fn dropping_gate_stops_listening() {
    let hub = SessionHub::new();
    let gate = SessionGate::start(&hub).await;
    let view = gate.watch();
    drop(gate);
    tokio::task::yield_now().await;

    hub.publish(session("after@example.com"));
    tokio::task::yield_now().await;

    assert!(view.borrow().is_none());
}

#[test]
fn debug_output_hides_token() {
    let rendered = format!("{:?}", session("ama@example.com"));
    assert!(rendered.contains("<redacted>"));
    assert!(!rendered.contains("\"token\""));
}
