use std::time::{Duration, Instant};

use super::classifier::{ReloadClassifier, ReloadDecision};
use super::debouncer::Debouncer;
use crate::config::ReloadConfig;
use crate::protocol::ServedFile;

const Q: Duration = Duration::from_millis(500);

fn file(web_path: &str) -> ServedFile {
    ServedFile::new(format!("/srv/site{web_path}"), web_path)
}

fn default_inject() -> Vec<String> {
    ReloadConfig::default().inject
}

fn decide(paths: &[&str]) -> Option<ReloadDecision> {
    let batch: Vec<_> = paths.iter().map(|p| file(p)).collect();
    ReloadClassifier::classify(batch, &default_inject()).map(|(decision, _)| decision)
}

// ----------------------------------------------------------------------------
// Debouncer
// ----------------------------------------------------------------------------

#[test]
fn test_debouncer_idle_is_silent() {
    let mut debouncer = Debouncer::new(Q);
    assert!(!debouncer.is_ready());
    assert!(debouncer.take_if_ready().is_none());
    assert!(debouncer.sleep_duration() >= Duration::from_secs(3600));
}

#[test]
fn test_debouncer_not_ready_inside_window() {
    let mut debouncer = Debouncer::new(Q);
    debouncer.add_event(file("/style.css"));
    assert!(!debouncer.is_ready());
    assert!(debouncer.take_if_ready().is_none());
    assert_eq!(debouncer.pending.len(), 1, "unready take must not drain");
}

#[test]
fn test_single_event_yields_one_batch() {
    let mut debouncer = Debouncer::new(Q);
    debouncer.add_event(file("/style.css"));
    debouncer.last_event = Some(Instant::now() - Q - Duration::from_millis(10));

    let batch = debouncer.take_if_ready().expect("window elapsed");
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].web_path.to_string_lossy(), "/style.css");

    // Second close without new events produces nothing
    assert!(debouncer.take_if_ready().is_none());
}

#[test]
fn test_burst_coalesces_in_arrival_order() {
    let mut debouncer = Debouncer::new(Q);
    debouncer.add_event(file("/a.css"));
    debouncer.add_event(file("/b.js"));
    debouncer.add_event(file("/c.png"));
    debouncer.last_event = Some(Instant::now() - Q);

    let batch = debouncer.take_if_ready().expect("window elapsed");
    let paths: Vec<_> = batch
        .iter()
        .map(|item| item.web_path.to_string_lossy().into_owned())
        .collect();
    assert_eq!(paths, vec!["/a.css", "/b.js", "/c.png"]);
}

#[test]
fn test_repeated_path_is_not_deduplicated() {
    let mut debouncer = Debouncer::new(Q);
    debouncer.add_event(file("/style.css"));
    debouncer.add_event(file("/style.css"));
    debouncer.last_event = Some(Instant::now() - Q);

    let batch = debouncer.take_if_ready().expect("window elapsed");
    assert_eq!(batch.len(), 2);
}

#[test]
fn test_each_event_resets_the_window() {
    let mut debouncer = Debouncer::new(Q);
    debouncer.add_event(file("/a.css"));
    debouncer.last_event = Some(Instant::now() - Duration::from_millis(300));
    assert!(!debouncer.is_ready());

    // A second event 300ms in restarts the window from now
    debouncer.add_event(file("/b.css"));
    let dur = debouncer.sleep_duration();
    assert!(dur >= Q - Duration::from_millis(10));
    assert!(dur <= Q + Duration::from_millis(10));
}

#[test]
fn test_sleep_duration_counts_down() {
    let mut debouncer = Debouncer::new(Q);
    debouncer.add_event(file("/a.css"));
    debouncer.last_event = Some(Instant::now() - Duration::from_millis(400));

    let dur = debouncer.sleep_duration();
    assert!(dur <= Duration::from_millis(110));
    assert!(dur >= Duration::from_millis(1));
}

// ----------------------------------------------------------------------------
// Classifier
// ----------------------------------------------------------------------------

#[test]
fn test_all_injectable_batch_injects() {
    // Scenario A
    assert_eq!(decide(&["/style.css"]), Some(ReloadDecision::Inject));
    assert_eq!(
        decide(&["/style.css", "/logo.png", "/hero.jpg"]),
        Some(ReloadDecision::Inject)
    );
}

#[test]
fn test_one_non_injectable_forces_reload() {
    // Scenario B
    assert_eq!(
        decide(&["/style.css", "/app.js"]),
        Some(ReloadDecision::Reload)
    );
    assert_eq!(decide(&["/index.html"]), Some(ReloadDecision::Reload));
}

#[test]
fn test_source_map_only_batch_yields_no_decision() {
    // Scenario C
    assert_eq!(decide(&["/style.css.map"]), None);
    assert_eq!(decide(&["/a.map", "/b.js.map"]), None);
}

#[test]
fn test_source_maps_never_influence_decision() {
    assert_eq!(
        decide(&["/style.css", "/style.css.map"]),
        Some(ReloadDecision::Inject)
    );
    assert_eq!(
        decide(&["/app.js", "/app.js.map"]),
        Some(ReloadDecision::Reload)
    );
}

#[test]
fn test_decision_is_monotonic() {
    // Adding one non-matching event to an all-matching batch flips Inject
    // to Reload; adding further matching events never flips it back
    let mut paths = vec!["/a.css", "/b.css"];
    assert_eq!(decide(&paths), Some(ReloadDecision::Inject));

    paths.push("/index.html");
    assert_eq!(decide(&paths), Some(ReloadDecision::Reload));

    paths.push("/c.css");
    paths.push("/d.png");
    assert_eq!(decide(&paths), Some(ReloadDecision::Reload));
}

#[test]
fn test_matching_uses_served_path_not_fs_path() {
    // On disk it's a .css file, but it is served as /page - not injectable
    let disguised = ServedFile::new("/srv/site/page.css", "/page");
    let (decision, _) = ReloadClassifier::classify(vec![disguised], &default_inject()).unwrap();
    assert_eq!(decision, ReloadDecision::Reload);

    // Conversely a generated asset served under .css is injectable
    let generated = ServedFile::new("/srv/cache/4f2a0b", "/assets/site.css");
    let (decision, _) = ReloadClassifier::classify(vec![generated], &default_inject()).unwrap();
    assert_eq!(decision, ReloadDecision::Inject);
}

#[test]
fn test_custom_pattern_set() {
    let inject = vec![".webp".to_string()];
    let (decision, _) =
        ReloadClassifier::classify(vec![file("/hero.webp")], &inject).unwrap();
    assert_eq!(decision, ReloadDecision::Inject);

    let (decision, _) =
        ReloadClassifier::classify(vec![file("/style.css")], &inject).unwrap();
    assert_eq!(decision, ReloadDecision::Reload);
}

#[test]
fn test_classify_preserves_batch_order() {
    let batch = vec![file("/a.css"), file("/b.js"), file("/c.css")];
    let (_, items) = ReloadClassifier::classify(batch, &default_inject()).unwrap();
    let paths: Vec<_> = items
        .iter()
        .map(|item| item.web_path.to_string_lossy().into_owned())
        .collect();
    assert_eq!(paths, vec!["/a.css", "/b.js", "/c.css"]);
}
