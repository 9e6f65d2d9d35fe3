//! End-to-end generation for the picture feed: declarations in, comparison
//! and dispatch behavior out, evaluated against map-backed records.

use diffbind::{design::prelude::*, prelude::*};
use proptest::prelude::*;
use std::collections::BTreeMap;
use tempfile::TempDir;

const PICTURE: &str = "app::Picture";
const INSTRUCTOR: &str = "app::PictureInstructor";

fn string(name: &str) -> Param {
    Param::new(name, TypeRef::of("String"))
}

fn declarations(handlers: Vec<Method>) -> Declarations {
    let line = TypeDecl::class("app::Line").constructor(vec![string("left"), string("right")]);

    let picture = TypeDecl::class(PICTURE)
        .tagged(Attribute::Model)
        .constructor(vec![
            string("tag").tagged(Attribute::Identity),
            string("image"),
            Param::new("line", TypeRef::of("app::Line")).tagged(Attribute::Embedded),
            string("image_code").tagged(Attribute::Excluded),
            string("title"),
            Param::new("desc", TypeRef::of("String").nullable()),
            Param::new("likes", TypeRef::of("u32")),
        ]);

    let view = TypeDecl::class("app::PictureView")
        .method(Method::new("set_image").param("value", TypeRef::of("String")))
        .method(Method::new("set_title").param("value", TypeRef::of("String")))
        .method(Method::new("bind_title").param("value", TypeRef::of("String")))
        .method(Method::new("set_left_in_line").param("value", TypeRef::of("String")));

    let mut instructor = TypeDecl::class(INSTRUCTOR)
        .tagged(Attribute::Instructor {
            model: PICTURE.into(),
        })
        .tagged(Attribute::BindView {
            view: "app::PictureView".into(),
            prefix: None,
            bind_prefix: None,
            suffix: None,
        });
    for handler in handlers {
        instructor = instructor.method(handler);
    }

    Declarations::new(vec![line, picture, view, instructor])
}

fn default_handlers() -> Vec<Method> {
    vec![
        Method::new("on_likes").tagged(Attribute::BindOn {
            field: "likes".into(),
        }),
        Method::new("on_refresh").tagged(Attribute::BindOnTag {
            tag: "app::Refresh".into(),
        }),
    ]
}

fn generated(handlers: Vec<Method>) -> (GeneratedUnit, CollectingSink, TempDir) {
    let dir = TempDir::new().unwrap();
    let mut config = BuildConfig::default();
    config.catalog.snapshot_dir = dir.path().to_path_buf();

    let mut sink = CollectingSink::new();
    let unit = generate(&declarations(handlers), &config, &mut sink).unwrap();

    (unit, sink, dir)
}

fn picture(likes: u32, desc: Option<&str>, left: &str) -> Record {
    Record::new(PICTURE)
        .with("tag", "p-1")
        .with("image", "cat.png")
        .with("image_code", "x9")
        .with("title", "Cat")
        .with("desc", desc.map(str::to_string))
        .with("likes", likes)
        .with(
            "line",
            Value::structure([("left", left.to_string()), ("right", "r".to_string())]),
        )
}

#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<String>,
}

impl BindTarget for Recorder {
    fn call_handler(&mut self, handler: &str, arg: HandlerArg) {
        self.calls.push(format!("{handler}({arg:?})"));
    }

    fn call_view(&mut self, method: &str, value: Value) {
        self.calls.push(format!("{method}={value:?}"));
    }
}

#[test]
fn taxonomy_orders_embedded_leaves_last() {
    let (unit, _, _dir) = generated(default_handlers());

    let plan = &unit.comparison_plans[PICTURE];
    let variants: Vec<_> = plan.leaves().iter().map(|l| l.variant.as_str()).collect();

    assert_eq!(
        variants,
        [
            "ImageChanged",
            "TitleChanged",
            "DescChanged",
            "LikesChanged",
            "LeftInLineChanged",
            "RightInLineChanged",
        ]
    );
    assert_eq!(plan.identity(), &LeafPath::top("tag"));
}

#[test]
fn changing_likes_yields_one_payload() {
    let (unit, _, _dir) = generated(default_handlers());
    let engine = &unit.comparison_plans[PICTURE];

    let old = picture(1, Some("d"), "l");
    let new = picture(2, Some("d"), "l");

    assert!(engine.are_items_the_same(&old, &new));
    assert!(!engine.are_contents_the_same(&old, &new));
    assert_eq!(
        engine.change_payloads(&old, &new),
        [Payload::new("LikesChanged", LeafPath::top("likes"), 2_u32)]
    );
}

#[test]
fn excluded_field_never_produces_a_payload() {
    let (unit, _, _dir) = generated(default_handlers());
    let engine = &unit.comparison_plans[PICTURE];

    let old = picture(1, None, "l");
    let new = old.clone().with("image_code", "y0");

    assert!(engine.are_contents_the_same(&old, &new));
    assert!(engine.change_payloads(&old, &new).is_empty());
}

#[test]
fn missing_desc_handler_is_a_no_op_with_one_warning() {
    let (unit, sink, _dir) = generated(default_handlers());
    let table = &unit.dispatch_tables[PICTURE];

    assert_eq!(table.update_action("DescChanged"), Some(&Action::NoOp));

    let desc_warnings: Vec<_> = sink
        .warnings()
        .filter(|d| d.message.contains("DescChanged"))
        .collect();
    assert_eq!(desc_warnings.len(), 1);
    assert_eq!(desc_warnings[0].declaration, INSTRUCTOR);

    let initial_leaves: Vec<_> = table
        .initial_actions()
        .iter()
        .filter_map(|a| match a {
            Action::View { leaf, .. } => Some(leaf.field.as_str()),
            _ => None,
        })
        .collect();
    assert!(!initial_leaves.contains(&"desc"));
}

#[test]
fn dispatch_routes_payloads_and_tags() {
    let (unit, _, _dir) = generated(default_handlers());
    let table = &unit.dispatch_tables[PICTURE];

    let notifications = extract_payloads(&[
        Incoming::One(Payload::new("LikesChanged", LeafPath::top("likes"), 7_u32).into()),
        Incoming::One(Payload::new("TitleChanged", LeafPath::top("title"), "Dog").into()),
        Incoming::One(Payload::new("DescChanged", LeafPath::top("desc"), "new").into()),
        Incoming::One(Notification::tag("app::Refresh")),
    ]);

    let mut recorder = Recorder::default();
    let mut empty = 0;
    table.inspect_payloads(&notifications, &mut recorder, &mut || empty += 1);

    assert_eq!(
        recorder.calls,
        [
            "on_likes(None)",
            "set_title=Text(\"Dog\")",
            "on_refresh(None)",
        ]
    );
    assert_eq!(empty, 0);
}

#[test]
fn empty_notifications_fall_back_to_a_plain_bind() {
    let (unit, _, _dir) = generated(default_handlers());
    let table = &unit.dispatch_tables[PICTURE];

    let mut recorder = Recorder::default();
    let mut empty = 0;
    table.inspect_payloads(&extract_payloads(&[]), &mut recorder, &mut || empty += 1);

    assert_eq!(empty, 1);
    assert!(recorder.calls.is_empty());
}

#[test]
fn initial_bind_prefers_binder_over_setter() {
    let (unit, _, _dir) = generated(default_handlers());
    let table = &unit.dispatch_tables[PICTURE];

    let mut recorder = Recorder::default();
    table.bind(&picture(5, Some("d"), "left"), &mut recorder);

    assert_eq!(
        recorder.calls,
        [
            "set_image=Text(\"cat.png\")",
            "bind_title=Text(\"Cat\")",
            "on_likes(None)",
            "set_left_in_line=Text(\"left\")",
        ]
    );
}

#[test]
fn legacy_bool_handler_distinguishes_bind_from_update() {
    let handlers = vec![
        Method::new("on_likes")
            .param("initial", TypeRef::of("bool"))
            .tagged(Attribute::BindOn {
                field: "likes".into(),
            }),
    ];
    let (unit, _, _dir) = generated(handlers);
    let table = &unit.dispatch_tables[PICTURE];

    assert_eq!(
        table.update_action("LikesChanged"),
        Some(&Action::handler("on_likes", HandlerArg::Bool(false)))
    );
    assert!(
        table
            .initial_actions()
            .contains(&Action::handler("on_likes", HandlerArg::Bool(true)))
    );
}

#[test]
fn generation_is_deterministic() {
    let (a, _, _dir_a) = generated(default_handlers());
    let (b, _, _dir_b) = generated(default_handlers());

    let contents = |unit: &GeneratedUnit| -> BTreeMap<String, String> {
        unit.artifacts
            .iter()
            .map(|a| (a.file_name.clone(), a.contents.clone()))
            .collect()
    };

    assert_eq!(contents(&a), contents(&b));
    assert_eq!(a.dispatch_tables, b.dispatch_tables);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn payloads_are_empty_exactly_when_contents_match(
        likes in (0_u32..4, 0_u32..4),
        desc in (proptest::option::of("[a-c]"), proptest::option::of("[a-c]")),
        left in ("[a-c]", "[a-c]"),
    ) {
        let (unit, _, _dir) = generated(default_handlers());
        let engine = &unit.comparison_plans[PICTURE];

        let old = picture(likes.0, desc.0.as_deref(), &left.0);
        let new = picture(likes.1, desc.1.as_deref(), &left.1);
        let payloads = engine.change_payloads(&old, &new);

        prop_assert_eq!(payloads.is_empty(), engine.are_contents_the_same(&old, &new));
        prop_assert_eq!(payloads.len(), usize::from(likes.0 != likes.1)
            + usize::from(desc.0 != desc.1)
            + usize::from(left.0 != left.1));
    }
}
