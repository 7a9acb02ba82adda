//! # Board Reducer
//!
//! Pure fold from `(state, action)` to a new state. Replaying a board's log
//! through [`fold_all`] is the only way a `BoardState` comes into being.
//!
//! `apply` never fails. Actions aimed at a missing block, `set-text` on a
//! non-text block, a duplicate `add-block`, an `add-block` of an unknown block
//! type and unknown record types all return an unchanged copy of the input.

use crate::models::{Action, Block, BoardState, PlacedBlock, Size};

/// Applies one action, leaving `state` untouched and returning the successor.
pub fn apply(state: &BoardState, action: &Action) -> BoardState {
    let mut next = state.clone();
    match action {
        Action::AddBlock {
            block,
            position,
            width,
            height,
        } => {
            let Some(id) = block.id().map(str::to_string) else {
                return next;
            };
            if next.blocks.contains_key(&id) {
                return next;
            }
            next.blocks.insert(
                id.clone(),
                PlacedBlock {
                    block: block.clone(),
                    position: *position,
                    size: Size {
                        width: *width,
                        height: *height,
                    },
                },
            );
            next.block_ids.push(id);
        }
        Action::Remove { block_id } => {
            if next.blocks.remove(block_id).is_some() {
                next.block_ids.retain(|id| id != block_id);
            }
        }
        Action::SetText { block_id, text } => {
            if let Some(PlacedBlock {
                block: Block::Text { text: current, .. },
                ..
            }) = next.blocks.get_mut(block_id)
            {
                current.clone_from(text);
            }
        }
        Action::Move { block_id, position } => {
            if let Some(placed) = next.blocks.get_mut(block_id) {
                placed.position = *position;
            }
        }
        Action::Resize { block_id, size } => {
            if let Some(placed) = next.blocks.get_mut(block_id) {
                placed.size = *size;
            }
        }
        Action::BringToFront { block_id } => {
            if next.blocks.contains_key(block_id) {
                next.block_ids.retain(|id| id != block_id);
                next.block_ids.push(block_id.clone());
            }
        }
        Action::BringToBack { block_id } => {
            if next.blocks.contains_key(block_id) {
                next.block_ids.retain(|id| id != block_id);
                next.block_ids.insert(0, block_id.clone());
            }
        }
        Action::Unknown => {}
    }
    next
}

/// Replays `actions` left to right from the empty board.
pub fn fold_all<'a, I>(actions: I) -> BoardState
where
    I: IntoIterator<Item = &'a Action>,
{
    actions
        .into_iter()
        .fold(BoardState::empty(), |state, action| apply(&state, action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;
    use proptest::prelude::*;

    fn text(id: &str, body: &str) -> Action {
        Action::AddBlock {
            block: Block::Text {
                id: id.into(),
                text: body.into(),
            },
            position: Position { x: 0.0, y: 0.0 },
            width: 100.0,
            height: 50.0,
        }
    }

    fn image(id: &str) -> Action {
        Action::AddBlock {
            block: Block::Image {
                id: id.into(),
                url: format!("/uploads/{id}.png"),
            },
            position: Position { x: 10.0, y: 20.0 },
            width: 200.0,
            height: 150.0,
        }
    }

    #[test]
    fn add_block_on_empty_board() {
        let state = apply(&BoardState::empty(), &text("b1", "hi"));
        assert_eq!(state.block_ids, vec!["b1"]);
        match &state.blocks["b1"].block {
            Block::Text { text, .. } => assert_eq!(text, "hi"),
            other => panic!("expected text block, got {other:?}"),
        }
        assert_eq!(
            state.blocks["b1"].size,
            Size {
                width: 100.0,
                height: 50.0
            }
        );
    }

    #[test]
    fn add_block_goes_on_top() {
        let state = fold_all(&[text("a", "1"), image("b"), text("c", "3")]);
        assert_eq!(state.block_ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn duplicate_add_block_is_ignored() {
        let before = fold_all(&[text("a", "first")]);
        let after = apply(&before, &text("a", "second"));
        assert_eq!(before, after);
    }

    #[test]
    fn bring_to_back_with_single_block_keeps_order() {
        let state = fold_all(&[text("b1", "hi")]);
        let next = apply(
            &state,
            &Action::BringToBack {
                block_id: "b1".into(),
            },
        );
        assert_eq!(next.block_ids, vec!["b1"]);
    }

    #[test]
    fn bring_to_front_and_back_reorder() {
        let state = fold_all(&[text("a", ""), text("b", ""), text("c", "")]);
        let front = apply(
            &state,
            &Action::BringToFront {
                block_id: "a".into(),
            },
        );
        assert_eq!(front.block_ids, vec!["b", "c", "a"]);
        let back = apply(
            &front,
            &Action::BringToBack {
                block_id: "c".into(),
            },
        );
        assert_eq!(back.block_ids, vec!["c", "b", "a"]);
        // prior snapshots are untouched
        assert_eq!(state.block_ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn move_after_remove_is_noop() {
        let state = fold_all(&[text("x", "hi"), text("y", "there")]);
        let removed = apply(
            &state,
            &Action::Remove {
                block_id: "x".into(),
            },
        );
        assert_eq!(removed.block_ids, vec!["y"]);
        assert!(!removed.blocks.contains_key("x"));

        let moved = apply(
            &removed,
            &Action::Move {
                block_id: "x".into(),
                position: Position { x: 5.0, y: 5.0 },
            },
        );
        assert_eq!(moved, removed);
    }

    #[test]
    fn set_text_on_image_is_noop() {
        let state = fold_all(&[image("b1")]);
        let next = apply(
            &state,
            &Action::SetText {
                block_id: "b1".into(),
                text: "x".into(),
            },
        );
        assert_eq!(next, state);
    }

    #[test]
    fn set_text_move_resize_update_fields() {
        let state = fold_all(&[
            text("b1", "hi"),
            Action::SetText {
                block_id: "b1".into(),
                text: "hello".into(),
            },
            Action::Move {
                block_id: "b1".into(),
                position: Position { x: 3.0, y: 4.0 },
            },
            Action::Resize {
                block_id: "b1".into(),
                size: Size {
                    width: 10.0,
                    height: 20.0,
                },
            },
        ]);
        let placed = &state.blocks["b1"];
        assert_eq!(
            placed.block,
            Block::Text {
                id: "b1".into(),
                text: "hello".into()
            }
        );
        assert_eq!(placed.position, Position { x: 3.0, y: 4.0 });
        assert_eq!(
            placed.size,
            Size {
                width: 10.0,
                height: 20.0
            }
        );
    }

    #[test]
    fn add_block_of_unknown_type_is_noop() {
        let state = fold_all(&[text("b1", "hi")]);
        let video: Action = serde_json::from_str(
            r#"{"type":"add-block","block":{"type":"video","id":"v1","src":"/v.mp4"},"position":{"x":0,"y":0},"width":10,"height":10}"#,
        )
        .unwrap();
        assert_eq!(video.block_id(), None);
        assert_eq!(apply(&state, &video), state);
    }

    #[test]
    fn unknown_action_is_noop() {
        let state = fold_all(&[text("b1", "hi")]);
        assert_eq!(apply(&state, &Action::Unknown), state);
    }

    #[test]
    fn missing_block_actions_are_noops() {
        let state = fold_all(&[text("b1", "hi")]);
        let ghost = || "ghost".to_string();
        for action in [
            Action::Remove { block_id: ghost() },
            Action::SetText {
                block_id: ghost(),
                text: "boo".into(),
            },
            Action::Resize {
                block_id: ghost(),
                size: Size::default(),
            },
            Action::BringToFront { block_id: ghost() },
            Action::BringToBack { block_id: ghost() },
        ] {
            assert_eq!(
                apply(&state, &action),
                state,
                "{} changed state",
                action.kind()
            );
        }
    }

    fn arb_action() -> impl Strategy<Value = Action> {
        let id = prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(String::from);
        let pos = (-100.0f64..100.0, -100.0f64..100.0).prop_map(|(x, y)| Position { x, y });
        prop_oneof![
            (id.clone(), ".{0,8}", pos.clone()).prop_map(|(id, text, position)| Action::AddBlock {
                block: Block::Text { id, text },
                position,
                width: 10.0,
                height: 10.0,
            }),
            (id.clone(), pos.clone()).prop_map(|(id, position)| Action::AddBlock {
                block: Block::Image { url: format!("/u/{id}"), id },
                position,
                width: 10.0,
                height: 10.0,
            }),
            id.clone().prop_map(|block_id| Action::Remove { block_id }),
            (id.clone(), ".{0,8}").prop_map(|(block_id, text)| Action::SetText { block_id, text }),
            (id.clone(), pos).prop_map(|(block_id, position)| Action::Move { block_id, position }),
            (id.clone(), 0.0f64..500.0, 0.0f64..500.0).prop_map(|(block_id, width, height)| {
                Action::Resize {
                    block_id,
                    size: Size { width, height },
                }
            }),
            id.clone().prop_map(|block_id| Action::BringToFront { block_id }),
            id.prop_map(|block_id| Action::BringToBack { block_id }),
            Just(Action::Unknown),
            Just(Action::AddBlock {
                block: Block::Unknown,
                position: Position::default(),
                width: 10.0,
                height: 10.0,
            }),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_for_every_prefix(actions in prop::collection::vec(arb_action(), 0..40)) {
            let mut state = BoardState::empty();
            prop_assert!(state.check_invariants());
            for action in &actions {
                state = apply(&state, action);
                prop_assert!(state.check_invariants(), "broken after {:?}", action);
            }
        }

        #[test]
        fn replay_is_deterministic(actions in prop::collection::vec(arb_action(), 0..40)) {
            let first = fold_all(&actions);
            let second = fold_all(&actions);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
        }
    }
}
