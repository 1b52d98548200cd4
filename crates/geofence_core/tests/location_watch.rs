use geofence_core::{
    ChannelLocationSource, LocationError, LocationEvent, LocationOptions, LocationSource,
    LocationWatcher, Position,
};
use std::time::Duration;

#[test]
fn watch_options_allow_older_fixes_than_one_shot() {
    let one_shot = LocationOptions::one_shot();
    let watch = LocationOptions::watch();

    assert!(one_shot.high_accuracy && watch.high_accuracy);
    assert_eq!(one_shot.timeout, Duration::from_secs(30));
    assert_eq!(one_shot.maximum_age, Duration::from_secs(1));
    assert_eq!(watch.maximum_age, Duration::from_secs(2));
}

#[test]
fn starting_a_new_watch_releases_the_previous_handle() {
    let mut watcher = LocationWatcher::new(ChannelLocationSource::new());

    let first = watcher.start(&LocationOptions::watch()).expect("start watch");
    let second = watcher.start(&LocationOptions::watch()).expect("start watch");

    assert_ne!(first, second);
    assert_eq!(watcher.active_handle(), Some(second));
    assert!(!watcher.source().is_active(first));
    assert!(watcher.source().is_active(second));
    assert_eq!(watcher.source().active_subscriptions(), 1);
}

#[test]
fn stop_releases_handle_and_drops_further_events() {
    let mut watcher = LocationWatcher::new(ChannelLocationSource::new());
    watcher.start(&LocationOptions::watch()).expect("start watch");

    watcher.stop();

    assert_eq!(watcher.active_handle(), None);
    assert_eq!(watcher.source().active_subscriptions(), 0);
    assert_eq!(
        watcher
            .source_mut()
            .push(LocationEvent::Position(Position::new(1.0, 2.0))),
        0
    );
    assert_eq!(watcher.try_next(), None);
}

#[test]
fn events_arrive_in_push_order() {
    let mut watcher = LocationWatcher::new(ChannelLocationSource::new());
    watcher.start(&LocationOptions::watch()).expect("start watch");

    let events = [
        LocationEvent::Position(Position::new(1.0, 1.0)),
        LocationEvent::Error(LocationError::Timeout),
        LocationEvent::Position(Position::new(2.0, 2.0)),
    ];
    for event in events {
        assert_eq!(watcher.source_mut().push(event), 1);
    }

    let received: Vec<LocationEvent> = std::iter::from_fn(|| watcher.try_next()).collect();
    assert_eq!(received, events);
}

#[test]
fn cancelled_subscription_drains_queued_events_then_disconnects() {
    let mut source = ChannelLocationSource::new();
    let subscription = source.watch(&LocationOptions::watch()).expect("subscribe");
    source.push(LocationEvent::Position(Position::new(3.0, 4.0)));

    source.cancel(subscription.handle);

    assert_eq!(
        subscription.events.try_recv().expect("queued event"),
        LocationEvent::Position(Position::new(3.0, 4.0))
    );
    assert!(subscription.events.try_recv().is_err());
}

#[test]
fn one_shot_uses_queued_result_then_last_known_position() {
    let mut source = ChannelLocationSource::new();
    let options = LocationOptions::one_shot();

    assert_eq!(
        source.current_position(&options),
        Err(LocationError::PositionUnavailable)
    );

    source.queue_one_shot(Err(LocationError::PermissionDenied));
    source.queue_one_shot(Ok(Position::new(5.0, 6.0)));
    assert_eq!(
        source.current_position(&options),
        Err(LocationError::PermissionDenied)
    );
    assert_eq!(
        source.current_position(&options),
        Ok(Position::new(5.0, 6.0))
    );
    assert_eq!(
        source.current_position(&options),
        Ok(Position::new(5.0, 6.0))
    );
}

#[test]
fn unsupported_source_fails_every_request() {
    let mut watcher = LocationWatcher::new(ChannelLocationSource::unsupported());

    assert_eq!(
        watcher.start(&LocationOptions::watch()),
        Err(LocationError::Unsupported)
    );
    assert_eq!(
        watcher.current_position(&LocationOptions::one_shot()),
        Err(LocationError::Unsupported)
    );
    assert_eq!(watcher.active_handle(), None);
}
