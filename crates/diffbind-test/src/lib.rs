//! Host crate exercising generated artifacts end to end: `build.rs` runs
//! `diffbind::build!` over `declarations.json`, and the output is mounted
//! at the crate root below.

pub mod model;
pub mod view;

include!(concat!(env!("OUT_DIR"), "/diffbind.rs"));

///
/// Refresh
///
/// External tag type; instances are dispatched outside field diffing.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct Refresh;

pub const REFRESH: &str = "crate::Refresh";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{Avatar, Line, Mood, Picture},
        view::PictureView,
    };
    use diffbind::prelude::*;

    const PICTURE: &str = "crate::model::Picture";
    const AVATAR: &str = "crate::model::Avatar";
    const INSTRUCTOR: &str = "crate::view::PictureInstructor";

    fn picture(likes: u32) -> Picture {
        Picture {
            tag: "p-1".into(),
            image: "cat.png".into(),
            line: Line {
                left: "l".into(),
                right: "r".into(),
            },
            image_code: "x9".into(),
            title: "Cat".into(),
            desc: None,
            likes,
        }
    }

    #[test]
    fn catalog_resolves_every_generated_engine() {
        let catalog = CATALOG.catalog().unwrap();

        assert!(catalog.comparison_engine(PICTURE).is_some());
        assert!(catalog.comparison_engine(AVATAR).is_some());
        assert!(CATALOG.is_loaded());
    }

    #[test]
    fn unknown_model_is_not_found() {
        let err = CATALOG
            .resolve_comparison_engine("crate::model::Missing")
            .err()
            .unwrap();

        assert!(err.is_not_found());
    }

    #[test]
    fn changing_likes_yields_one_payload() {
        let engine = CATALOG.resolve_comparison_engine(PICTURE).unwrap();

        let old = picture(1);
        let new = picture(2);

        assert!(engine.are_items_the_same(&old, &new));
        assert!(!engine.are_contents_the_same(&old, &new));
        assert_eq!(
            engine.change_payloads(&old, &new),
            [Payload::new("LikesChanged", LeafPath::top("likes"), 2_u32)]
        );
    }

    #[test]
    fn excluded_and_identity_fields_stay_out_of_payloads() {
        let engine = CATALOG.resolve_comparison_engine(PICTURE).unwrap();

        let old = picture(1);
        let new = Picture {
            image_code: "y0".into(),
            ..old.clone()
        };
        assert!(engine.change_payloads(&old, &new).is_empty());

        let other = Picture {
            tag: "p-2".into(),
            ..old.clone()
        };
        assert!(!engine.are_items_the_same(&old, &other));
        assert!(engine.are_contents_the_same(&old, &other));
    }

    #[test]
    fn absent_embedding_reads_as_null() {
        let engine = CATALOG.resolve_comparison_engine(AVATAR).unwrap();

        let framed = Avatar {
            id: 7,
            url: None,
            frame: Some(Line {
                left: "gold".into(),
                right: "gold".into(),
            }),
            ..Avatar::default()
        };
        let bare = Avatar {
            frame: None,
            ..framed.clone()
        };

        assert_eq!(
            engine.change_payloads(&framed, &bare),
            [
                Payload::new("LeftInFrameChanged", LeafPath::nested("frame", "left"), Value::Null),
                Payload::new("RightInFrameChanged", LeafPath::nested("frame", "right"), Value::Null),
            ]
        );
        assert_eq!(bare.leaf(&LeafPath::nested("frame", "left")), Value::Null);
    }

    #[test]
    fn pointer_sized_and_host_typed_leaves_diff() {
        let engine = CATALOG.resolve_comparison_engine(AVATAR).unwrap();

        let old = Avatar::default();
        let new = Avatar {
            views: 12,
            mood: Mood::Busy,
            ..old.clone()
        };

        assert_eq!(
            engine.change_payloads(&old, &new),
            [
                Payload::new("ViewsChanged", LeafPath::top("views"), 12_usize),
                Payload::new("MoodChanged", LeafPath::top("mood"), Mood::Busy),
            ]
        );
        assert_eq!(new.leaf(&LeafPath::top("views")), Value::Uint(12));
    }

    #[test]
    fn bind_populates_a_fresh_view() {
        let dispatcher = CATALOG
            .resolve_dispatcher_for_instructor(INSTRUCTOR)
            .unwrap();
        let mut view = PictureView::default();

        dispatcher.bind(&picture(3), &mut view);

        assert_eq!(view.image, "cat.png");
        assert_eq!(view.title, "Cat");
        assert!(view.title_bound);
        assert_eq!(view.likes_refreshes, 1);
        assert_eq!(view.line_refreshes, 1);
    }

    #[test]
    fn updates_route_to_handlers_and_setters() {
        let dispatcher = CATALOG.resolve_dispatcher(PICTURE).unwrap();
        let mut view = PictureView::default();
        let mut rebinds = 0;

        let notifications = extract_payloads(&[Incoming::Batch(vec![
            Payload::new("TitleChanged", LeafPath::top("title"), "Dog").into(),
            Payload::new("DescChanged", LeafPath::top("desc"), "ignored").into(),
            Payload::new("RightInLineChanged", LeafPath::nested("line", "right"), "x").into(),
            Notification::tag(REFRESH),
        ])]);
        dispatcher.inspect_payloads(&notifications, &mut view, &mut || rebinds += 1);

        assert_eq!(view.title, "Dog");
        assert!(!view.title_bound);
        assert_eq!(view.line_refreshes, 1);
        assert_eq!(view.refreshes, 1);
        assert_eq!(rebinds, 0);
    }

    #[test]
    fn direct_registry_matches_the_catalog() {
        let registry = registry();

        let direct = registry.resolve_comparison_engine(PICTURE).unwrap();
        let merged = CATALOG.resolve_comparison_engine(PICTURE).unwrap();
        assert_eq!(direct.model_key(), merged.model_key());

        let dispatcher = registry
            .resolve_dispatcher_for_instructor(INSTRUCTOR)
            .unwrap();
        assert_eq!(dispatcher.model_key(), PICTURE);

        assert!(registry.resolve_dispatcher(AVATAR).is_err());
    }

    #[test]
    fn cached_registry_reuses_generated_artifacts() {
        let registry = registry().cached();

        let first = registry.resolve_comparison_engine(AVATAR).unwrap();
        let second = registry.resolve_comparison_engine(AVATAR).unwrap();
        assert!(std::sync::Arc::ptr_eq(&first, &second));

        registry.clear_cache();
        let rebuilt = registry.resolve_comparison_engine(AVATAR).unwrap();
        assert!(!std::sync::Arc::ptr_eq(&first, &rebuilt));
        assert_eq!(rebuilt.model_key(), AVATAR);
    }
}
