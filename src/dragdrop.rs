use crate::button::LaunchItem;
use crate::layout::Metrics;
use crate::panel::Panel;
use eframe::egui;
use log::debug;
use std::path::{Path, PathBuf};

/// Classified drop payload. Internal button references never ride the OS
/// payload path; the shell constructs them from its own drag state.
#[derive(Debug, Clone, PartialEq)]
pub enum DropPayload {
    ButtonRef { source: usize, index: usize },
    Files(Vec<PathBuf>),
    Text(String),
}

/// Shortcut indirection (.lnk and friends) resolved per platform. Dropped
/// shortcuts are recorded under their real target.
pub trait ShortcutResolver {
    fn resolve(&self, path: &Path) -> Option<PathBuf>;
}

/// Resolver for platforms without shortcut files; also used in tests.
pub struct NoIndirection;

impl ShortcutResolver for NoIndirection {
    fn resolve(&self, _path: &Path) -> Option<PathBuf> {
        None
    }
}

/// Classifies an OS-level drop. Paths win over raw bytes; bytes are only
/// considered when they decode as UTF-8 text (typically a dragged URL).
pub fn classify(dropped: &[egui::DroppedFile]) -> Option<DropPayload> {
    let paths: Vec<PathBuf> = dropped.iter().filter_map(|f| f.path.clone()).collect();
    if !paths.is_empty() {
        return Some(DropPayload::Files(paths));
    }
    for file in dropped {
        if let Some(bytes) = &file.bytes {
            if let Ok(text) = std::str::from_utf8(bytes) {
                let text = text.trim();
                if !text.is_empty() {
                    return Some(DropPayload::Text(text.to_string()));
                }
            }
        }
    }
    None
}

/// Applies a classified payload to the target container. Malformed payloads
/// are discarded silently; returns whether anything was accepted.
pub fn apply(
    panel: &mut Panel,
    target: usize,
    payload: DropPayload,
    resolver: &dyn ShortcutResolver,
    m: &Metrics,
) -> bool {
    if target >= panel.containers.len() {
        return false;
    }
    match payload {
        DropPayload::ButtonRef { source, index } => {
            // Same-container drags are handled by the live reorder path.
            panel.move_button(source, index, target, m)
        }
        DropPayload::Files(paths) => {
            let items: Vec<LaunchItem> = paths
                .iter()
                .map(|path| {
                    let resolved = resolver.resolve(path);
                    LaunchItem::from_path(resolved.as_deref().unwrap_or(path))
                })
                .collect();
            if items.is_empty() {
                return false;
            }
            let container = &mut panel.containers[target];
            container.add_buttons(items, m);
            container.commit_order();
            true
        }
        DropPayload::Text(text) => {
            let Some(host) = url_host(&text) else {
                debug!("ignoring non-URL text drop");
                return false;
            };
            let container = &mut panel.containers[target];
            container.add_buttons(vec![LaunchItem::from_target(host, text)], m);
            container.commit_order();
            true
        }
    }
}

/// Host of an absolute URI, or None when the text is not one. Only
/// `scheme://authority` forms count; relative or bare text drops silently.
pub fn url_host(text: &str) -> Option<String> {
    let text = text.trim();
    let (scheme, rest) = text.split_once("://")?;
    let mut chars = scheme.chars();
    if !chars.next()?.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host = authority
        .rsplit_once('@')
        .map(|(_, h)| h)
        .unwrap_or(authority);
    // Bracketed IPv6 literals would need their own parsing; reject them
    // rather than yield a mangled display name.
    if host.starts_with('[') {
        return None;
    }
    let host = host.split(':').next().unwrap_or("");
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Container, ContainerKind};
    use crate::layout::ListEngine;

    struct FakeResolver;

    impl ShortcutResolver for FakeResolver {
        fn resolve(&self, path: &Path) -> Option<PathBuf> {
            if path.extension().is_some_and(|e| e == "lnk") {
                Some(PathBuf::from(r"C:\Real\resolved.exe"))
            } else {
                None
            }
        }
    }

    fn panel_with_containers(count: usize) -> (Panel, Metrics) {
        let m = Metrics::default();
        let mut make = |name: String| {
            let mut c = Container::new(name, ContainerKind::Normal, Box::new(ListEngine));
            c.bounds = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(200.0, 400.0));
            c.height = 400.0;
            c
        };
        let mut panel = Panel::new(make("group0".to_string()));
        for i in 1..count {
            panel.add_container(make(format!("group{i}")));
        }
        (panel, m)
    }

    #[test]
    fn file_drop_on_empty_container_commits_once() {
        let (mut panel, m) = panel_with_containers(1);
        let payload = DropPayload::Files(vec![
            PathBuf::from(r"C:\Apps\first.exe"),
            PathBuf::from(r"C:\Apps\second.exe"),
        ]);
        assert!(apply(&mut panel, 0, payload, &NoIndirection, &m));

        let items = panel.containers[0].items();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| !i.is_separator()));
        // Equal incoming counts keep original relative order; the commit
        // rewrites weights strictly descending.
        assert_eq!(items[0].name, "first");
        assert_eq!(items[1].name, "second");
        assert!(items[0].click_count > items[1].click_count);

        let notes = panel.drain_notifications();
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn shortcut_paths_are_resolved_to_their_target() {
        let (mut panel, m) = panel_with_containers(1);
        let payload = DropPayload::Files(vec![PathBuf::from(r"C:\Users\me\Desktop\app.lnk")]);
        assert!(apply(&mut panel, 0, payload, &FakeResolver, &m));
        assert_eq!(
            panel.containers[0].items()[0].target,
            r"C:\Real\resolved.exe"
        );
    }

    #[test]
    fn url_drop_uses_the_host_as_display_name() {
        let (mut panel, m) = panel_with_containers(1);
        let payload = DropPayload::Text("https://docs.example.com/guide?x=1".to_string());
        assert!(apply(&mut panel, 0, payload, &NoIndirection, &m));

        let items = panel.containers[0].items();
        assert_eq!(items[0].name, "docs.example.com");
        assert_eq!(items[0].target, "https://docs.example.com/guide?x=1");
    }

    #[test]
    fn malformed_text_is_dropped_silently() {
        let (mut panel, m) = panel_with_containers(1);
        for text in ["not a url", "/relative/path", "://missing-scheme", "http://"] {
            assert!(!apply(
                &mut panel,
                0,
                DropPayload::Text(text.to_string()),
                &NoIndirection,
                &m
            ));
        }
        assert!(panel.containers[0].buttons.is_empty());
        assert!(panel.drain_notifications().is_empty());
    }

    #[test]
    fn internal_drop_moves_across_containers_only() {
        let (mut panel, m) = panel_with_containers(2);
        panel.containers[0].add_buttons(
            vec![LaunchItem::from_target("x", r"C:\Apps\x.exe")],
            &m,
        );
        panel.drain_notifications();

        // Same-container reference is ignored by the drop path.
        let same = DropPayload::ButtonRef { source: 0, index: 0 };
        assert!(!apply(&mut panel, 0, same, &NoIndirection, &m));

        let cross = DropPayload::ButtonRef { source: 0, index: 0 };
        assert!(apply(&mut panel, 1, cross, &NoIndirection, &m));
        assert!(panel.containers[0].buttons.is_empty());
        assert_eq!(panel.containers[1].buttons.len(), 1);
    }

    #[test]
    fn classify_prefers_paths_then_utf8_text() {
        let with_path = vec![egui::DroppedFile {
            path: Some(PathBuf::from(r"C:\Apps\a.exe")),
            ..Default::default()
        }];
        assert!(matches!(
            classify(&with_path),
            Some(DropPayload::Files(paths)) if paths.len() == 1
        ));

        let with_text = vec![egui::DroppedFile {
            bytes: Some("https://example.com".as_bytes().into()),
            ..Default::default()
        }];
        assert_eq!(
            classify(&with_text),
            Some(DropPayload::Text("https://example.com".to_string()))
        );

        assert_eq!(classify(&[]), None);
    }

    #[test]
    fn url_host_accepts_only_absolute_uris() {
        assert_eq!(url_host("https://example.com"), Some("example.com".to_string()));
        assert_eq!(
            url_host("ftp://user:pw@files.example.com:21/dir"),
            Some("files.example.com".to_string())
        );
        assert_eq!(url_host("example.com/path"), None);
        assert_eq!(url_host("1http://bad-scheme.com"), None);
        assert_eq!(url_host("http://"), None);
        assert_eq!(url_host(""), None);
    }

    #[test]
    fn bracketed_ipv6_authorities_are_rejected() {
        assert_eq!(url_host("http://[::1]/admin"), None);
        assert_eq!(url_host("https://user@[2001:db8::1]:8080/x"), None);
    }
}
