use std::sync::Once;
use std::time::Duration;

use grabber_core::{update, AppState, Effect, Msg, Preview, PreviewEntry};
use pretty_assertions::assert_eq;
use url::Url;

const PLAYLIST_URL: &str = "https://www.youtube.com/playlist?list=PL123";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn new_state() -> AppState {
    AppState::new(Url::parse("http://localhost:5000/").unwrap())
}

fn playlist(n: usize) -> Preview {
    Preview {
        title: "Mix".to_string(),
        is_playlist: true,
        entries: (0..n)
            .map(|i| PreviewEntry {
                title: format!("Track {i}"),
                duration: Some(61.0),
                url: Some(format!("https://youtu.be/v{i}")),
            })
            .collect(),
    }
}

/// Types the URL, lets the debounce elapse and returns the issued request id.
fn open_preview(state: AppState, url: &str) -> (AppState, u64) {
    let (state, _) = update(state, Msg::InputChanged(url.to_string()));
    let (state, effects) = update(state, Msg::PreviewDue);
    let request_id = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchPreview { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("fetch preview effect");
    (state, request_id)
}

fn loaded_playlist(n: usize) -> AppState {
    let (state, request_id) = open_preview(new_state(), PLAYLIST_URL);
    let (state, _) = update(
        state,
        Msg::PreviewLoaded {
            request_id,
            result: Ok(playlist(n)),
        },
    );
    state
}

#[test]
fn non_video_input_hides_preview_without_request() {
    init_logging();
    let state = loaded_playlist(2);
    assert!(state.view().preview.is_some());

    let (state, effects) = update(state, Msg::InputChanged("https://example.com/x".into()));
    assert_eq!(effects, vec![Effect::CancelPendingPreview]);
    assert!(state.view().preview.is_none());

    let (_state, effects) = update(state, Msg::PreviewDue);
    assert!(effects.is_empty());
}

#[test]
fn video_input_schedules_debounced_preview() {
    init_logging();
    let (state, effects) = update(new_state(), Msg::InputChanged(format!("  {PLAYLIST_URL} ")));
    assert_eq!(
        effects,
        vec![Effect::SchedulePreview {
            delay: Duration::from_millis(800)
        }]
    );
    // Nothing is fetched until the timer fires.
    assert!(state.view().preview.is_none());

    let (state, effects) = update(state, Msg::PreviewDue);
    assert_eq!(
        effects,
        vec![Effect::FetchPreview {
            request_id: 1,
            url: PLAYLIST_URL.to_string(),
        }]
    );
    let preview = state.view().preview.expect("loading panel");
    assert!(preview.loading);
    assert_eq!(preview.title, "Loading preview...");
}

#[test]
fn custom_debounce_is_used_for_scheduling() {
    init_logging();
    let state = new_state().with_debounce(Duration::from_millis(250));
    let (_state, effects) = update(state, Msg::InputChanged("https://youtu.be/abc".into()));
    assert_eq!(
        effects,
        vec![Effect::SchedulePreview {
            delay: Duration::from_millis(250)
        }]
    );
}

#[test]
fn loaded_playlist_is_fully_checked() {
    init_logging();
    let preview = loaded_playlist(3).view().preview.expect("preview");
    assert_eq!(preview.title, "Playlist: Mix");
    assert!(!preview.loading);
    assert!(preview.select_all);
    assert_eq!(preview.entries.len(), 3);
    assert!(preview.entries.iter().all(|e| e.checked && e.selectable));
    assert_eq!(preview.entries[0].duration, "01:01");
}

#[test]
fn single_video_preview_is_labelled_as_video() {
    init_logging();
    let (state, request_id) = open_preview(new_state(), "https://youtu.be/abc");
    let (state, _) = update(
        state,
        Msg::PreviewLoaded {
            request_id,
            result: Ok(Preview {
                title: "Clip".into(),
                is_playlist: false,
                entries: vec![PreviewEntry {
                    title: "Clip".into(),
                    duration: None,
                    url: None,
                }],
            }),
        },
    );
    let preview = state.view().preview.expect("preview");
    assert_eq!(preview.title, "Video: Clip");
    assert_eq!(preview.entries[0].duration, "");
    assert!(!preview.entries[0].selectable);
}

#[test]
fn failed_preview_is_hidden_silently() {
    init_logging();
    let (state, request_id) = open_preview(new_state(), PLAYLIST_URL);
    let (state, effects) = update(
        state,
        Msg::PreviewLoaded {
            request_id,
            result: Err("http status 400".into()),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert!(view.preview.is_none());
    assert!(view.error.is_none());
    assert!(view.alert.is_none());
}

#[test]
fn stale_preview_response_is_discarded() {
    init_logging();
    let (state, first) = open_preview(new_state(), PLAYLIST_URL);
    let (state, second) = open_preview(state, "https://youtu.be/other");
    assert!(second > first);

    let (state, _) = update(
        state,
        Msg::PreviewLoaded {
            request_id: first,
            result: Ok(playlist(5)),
        },
    );
    assert!(state.view().preview.expect("still loading").loading);

    let (state, _) = update(
        state,
        Msg::PreviewLoaded {
            request_id: second,
            result: Ok(playlist(2)),
        },
    );
    assert_eq!(state.view().preview.expect("ready").entries.len(), 2);
}

#[test]
fn response_after_hiding_is_ignored() {
    init_logging();
    let (state, request_id) = open_preview(new_state(), PLAYLIST_URL);
    let (state, _) = update(state, Msg::InputChanged(String::new()));
    let (state, _) = update(
        state,
        Msg::PreviewLoaded {
            request_id,
            result: Ok(playlist(2)),
        },
    );
    assert!(state.view().preview.is_none());
}

#[test]
fn select_all_drives_every_entry() {
    init_logging();
    let state = loaded_playlist(3);

    let (state, _) = update(state, Msg::SelectAllToggled);
    let preview = state.view().preview.unwrap();
    assert!(!preview.select_all);
    assert!(preview.entries.iter().all(|e| !e.checked));

    let (state, _) = update(state, Msg::SelectAllToggled);
    let preview = state.view().preview.unwrap();
    assert!(preview.select_all);
    assert!(preview.entries.iter().all(|e| e.checked));
}

#[test]
fn unchecking_one_entry_clears_select_all_until_all_rechecked() {
    init_logging();
    let state = loaded_playlist(3);

    let (state, _) = update(state, Msg::EntryToggled(1));
    let preview = state.view().preview.unwrap();
    assert!(!preview.select_all);
    assert!(!preview.entries[1].checked);
    assert!(preview.entries[0].checked);

    let (state, _) = update(state, Msg::SelectAllToggled);
    assert!(state.view().preview.unwrap().select_all);

    let (state, _) = update(state, Msg::EntryToggled(0));
    assert!(!state.view().preview.unwrap().select_all);
    let (state, _) = update(state, Msg::EntryToggled(0));
    assert!(state.view().preview.unwrap().select_all);
}

#[test]
fn toggling_out_of_range_entry_is_noop() {
    init_logging();
    let mut state = loaded_playlist(2);
    state.consume_dirty();
    let before = state.view();

    let (mut state, effects) = update(state, Msg::EntryToggled(9));
    assert!(effects.is_empty());
    assert_eq!(state.view(), before);
    assert!(!state.consume_dirty());
}
