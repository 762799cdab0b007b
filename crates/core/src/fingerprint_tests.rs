use super::*;

#[test]
fn deterministic_for_same_path() {
    let a = ProjectFingerprint::of_str("/home/dev/project-a");
    let b = ProjectFingerprint::of_str("/home/dev/project-a");
    assert_eq!(a, b);
    assert_eq!(a.to_string(), b.to_string());
}

#[test]
fn differs_for_different_paths() {
    let a = ProjectFingerprint::of_str("/home/dev/project-a");
    let b = ProjectFingerprint::of_str("/home/dev/project-b");
    assert_ne!(a, b);
}

#[test]
fn is_fixed_width_lowercase_hex() {
    let fp = ProjectFingerprint::of_str("/anything/at/all");
    let rendered = fp.to_string();
    assert_eq!(rendered.len(), 16);
    assert!(rendered.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn lock_dir_name_embeds_fingerprint() {
    let fp = ProjectFingerprint::of_str("/srv/app");
    let name = fp.lock_dir_name();
    assert_eq!(name, format!("rr-{}.lock", fp));
    assert!(name.starts_with("rr-"));
    assert!(name.ends_with(".lock"));
}

#[test]
fn realistic_paths_do_not_collide() {
    let paths = [
        "/home/alice/work/frontend",
        "/home/alice/work/backend",
        "/home/bob/work/frontend",
        "/srv/ci/checkout-1",
        "/srv/ci/checkout-2",
        "/srv/ci/checkout-10",
    ];
    let mut seen = std::collections::HashSet::new();
    for p in paths {
        assert!(seen.insert(ProjectFingerprint::of_str(p).to_string()), "collision for {p}");
    }
}

proptest::proptest! {
    #[test]
    fn prop_deterministic(path in "[a-zA-Z0-9/_.-]{1,200}") {
        let a = ProjectFingerprint::of_str(&path);
        let b = ProjectFingerprint::of_str(&path);
        proptest::prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_always_16_hex_chars(path in "[a-zA-Z0-9/_.-]{1,200}") {
        let rendered = ProjectFingerprint::of_str(&path).to_string();
        proptest::prop_assert_eq!(rendered.len(), 16);
    }
}
