//! Pointer gesture state machine.

use std::time::Instant;

use strum::Display;

use tabfile_core::{ItemId, ItemKind, ItemRecord, SessionConfig};

use super::{
    DragEffects, HitTarget, InputAction, Modifiers, Point, PointerButton, PointerEvent,
    RectSelection, RenameEditor, Viewport,
};
use crate::selection::SelectionModel;

/// Where a gesture currently stands.
#[derive(Debug, Clone, PartialEq, Default, Display)]
pub enum InputState {
    #[default]
    Idle,
    /// Button down on an item, not yet moved.
    PressedOnItem {
        id: ItemId,
        origin: Point,
        button: PointerButton,
        /// Collapse a multi-selection to this item on release.
        collapse_on_release: bool,
    },
    /// Button down on blank space. `origin` is in content coordinates.
    PressedOnEmpty { origin: Point, button: PointerButton },
    RectSelecting(RectSelection),
    /// Button down on an item and moved, but still within the drag threshold.
    DragPending {
        id: ItemId,
        origin: Point,
        button: PointerButton,
        collapse_on_release: bool,
    },
    Dragging { payload: Vec<ItemId> },
    /// Pressed the sole selected item. The rename timer is armed on release.
    RenamePending {
        id: ItemId,
        origin: Point,
        deadline: Option<Instant>,
    },
    Renaming(RenameEditor),
}

/// Turns pointer events into selection changes and [`InputAction`]s.
///
/// The machine owns no items: each call takes the current item list and
/// the selection to mutate. Time only enters through event timestamps and
/// [`poll_timers`](Self::poll_timers).
#[derive(Debug, Clone)]
pub struct InputStateMachine {
    config: SessionConfig,
    viewport: Viewport,
    state: InputState,
    last_press: Option<(ItemId, Instant)>,
    suppress_gesture: bool,
}

impl InputStateMachine {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            viewport: Viewport::default(),
            state: InputState::Idle,
            last_press: None,
            suppress_gesture: false,
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Replace the list geometry (resize or host-driven scroll).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn rename_editor(&self) -> Option<&RenameEditor> {
        match &self.state {
            InputState::Renaming(editor) => Some(editor),
            _ => None,
        }
    }

    pub fn rename_editor_mut(&mut self) -> Option<&mut RenameEditor> {
        match &mut self.state {
            InputState::Renaming(editor) => Some(editor),
            _ => None,
        }
    }

    /// Earliest instant at which [`poll_timers`](Self::poll_timers) has work.
    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.state {
            InputState::RenamePending { deadline, .. } => *deadline,
            InputState::RectSelecting(rect) => rect.next_tick(),
            _ => None,
        }
    }

    /// Drop any gesture in progress and its timers.
    pub fn reset(&mut self) {
        self.state = InputState::Idle;
        self.last_press = None;
        self.suppress_gesture = false;
    }

    /// Feed one pointer event.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        items: &[ItemRecord],
        selection: &mut SelectionModel,
    ) -> Vec<InputAction> {
        match event {
            PointerEvent::Down {
                at,
                position,
                target,
                button,
                modifiers,
            } => self.on_down(at, position, target, button, modifiers, items, selection),
            PointerEvent::Move { at, position } => self.on_move(at, position, items, selection),
            PointerEvent::Up { at, position, .. } => self.on_up(at, position, items, selection),
            PointerEvent::FocusLost => self.on_focus_lost(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn on_down(
        &mut self,
        at: Instant,
        position: Point,
        target: HitTarget,
        button: PointerButton,
        modifiers: Modifiers,
        items: &[ItemRecord],
        selection: &mut SelectionModel,
    ) -> Vec<InputAction> {
        if target == HitTarget::RenameEditor {
            return Vec::new();
        }

        let mut actions: Vec<InputAction> = self.finish_rename().into_iter().collect();
        self.state = InputState::Idle;
        self.suppress_gesture = false;

        match target {
            HitTarget::Item(index) => {
                self.press_item(at, position, index, button, modifiers, items, selection, &mut actions)
            }
            HitTarget::Empty => {
                selection.clear();
                self.last_press = None;
                self.state = InputState::PressedOnEmpty {
                    origin: self.viewport.to_content(position),
                    button,
                };
            }
            HitTarget::RenameEditor => {}
        }
        actions
    }

    #[allow(clippy::too_many_arguments)]
    fn press_item(
        &mut self,
        at: Instant,
        origin: Point,
        index: usize,
        button: PointerButton,
        modifiers: Modifiers,
        items: &[ItemRecord],
        selection: &mut SelectionModel,
        actions: &mut Vec<InputAction>,
    ) {
        let Some(item) = items.get(index) else {
            return;
        };
        let id = item.id.clone();
        selection.set_last_pressed(Some(index));

        if button == PointerButton::Primary {
            if let Some((last_id, last_at)) = self.last_press.take() {
                let within = at.saturating_duration_since(last_at) <= self.config.double_click_interval();
                if last_id == id && within {
                    self.suppress_gesture = true;
                    actions.push(InputAction::ItemActivated { id, modifiers });
                    return;
                }
            }
            self.last_press = Some((id.clone(), at));
        } else {
            self.last_press = None;
        }

        let collapse_on_release = if modifiers.contains(Modifiers::CTRL) {
            selection.toggle_index(items, index);
            false
        } else if modifiers.contains(Modifiers::SHIFT) {
            selection.range_select(items, index);
            false
        } else if selection.is_sole(&id) {
            if button == PointerButton::Primary && item.kind != ItemKind::Drive {
                self.state = InputState::RenamePending {
                    id,
                    origin,
                    deadline: None,
                };
                return;
            }
            false
        } else if selection.contains(&id) {
            button == PointerButton::Primary
        } else {
            selection.select_index(items, index, false);
            false
        };

        self.state = InputState::PressedOnItem {
            id,
            origin,
            button,
            collapse_on_release,
        };
    }

    fn on_move(
        &mut self,
        at: Instant,
        position: Point,
        items: &[ItemRecord],
        selection: &mut SelectionModel,
    ) -> Vec<InputAction> {
        if self.suppress_gesture {
            return Vec::new();
        }

        let mut actions = Vec::new();
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            InputState::PressedOnItem {
                id,
                origin,
                button,
                collapse_on_release,
            }
            | InputState::DragPending {
                id,
                origin,
                button,
                collapse_on_release,
            } => {
                if self.beyond_threshold(origin, position) {
                    self.start_drag(items, selection, &mut actions)
                } else {
                    InputState::DragPending {
                        id,
                        origin,
                        button,
                        collapse_on_release,
                    }
                }
            }
            InputState::RenamePending {
                id,
                origin,
                deadline: None,
            } => {
                if self.beyond_threshold(origin, position) {
                    tracing::trace!(%id, "Drag cancelled pending rename");
                    self.start_drag(items, selection, &mut actions)
                } else {
                    InputState::RenamePending {
                        id,
                        origin,
                        deadline: None,
                    }
                }
            }
            InputState::PressedOnEmpty { origin, button } => {
                let current = self.viewport.to_content(position);
                if button == PointerButton::Primary && self.beyond_threshold(origin, current) {
                    let mut rect = RectSelection::begin(origin, &self.viewport);
                    if rect.pointer_moved(at, position, &self.viewport, items, selection, &self.config) {
                        actions.push(InputAction::SelectionChanged);
                    }
                    InputState::RectSelecting(rect)
                } else {
                    InputState::PressedOnEmpty { origin, button }
                }
            }
            InputState::RectSelecting(mut rect) => {
                if rect.pointer_moved(at, position, &self.viewport, items, selection, &self.config) {
                    actions.push(InputAction::SelectionChanged);
                }
                InputState::RectSelecting(rect)
            }
            other => other,
        };
        actions
    }

    fn on_up(
        &mut self,
        at: Instant,
        position: Point,
        items: &[ItemRecord],
        selection: &mut SelectionModel,
    ) -> Vec<InputAction> {
        if self.suppress_gesture {
            self.suppress_gesture = false;
            return Vec::new();
        }

        let mut actions = Vec::new();
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            InputState::PressedOnItem {
                id,
                button,
                collapse_on_release,
                ..
            }
            | InputState::DragPending {
                id,
                button,
                collapse_on_release,
                ..
            } => {
                if collapse_on_release {
                    if let Some(index) = position_of(items, &id) {
                        selection.select_index(items, index, false);
                    }
                }
                actions.push(match button {
                    PointerButton::Primary => InputAction::ItemClicked { id },
                    PointerButton::Secondary => InputAction::ContextMenu {
                        target: Some(id),
                        position,
                    },
                });
                InputState::Idle
            }
            InputState::RenamePending {
                id,
                origin,
                deadline: None,
            } => {
                actions.push(InputAction::ItemClicked { id: id.clone() });
                InputState::RenamePending {
                    id,
                    origin,
                    deadline: Some(at + self.config.rename_delay()),
                }
            }
            InputState::PressedOnEmpty { button, .. } => {
                if button == PointerButton::Secondary {
                    actions.push(InputAction::ContextMenu {
                        target: None,
                        position,
                    });
                }
                InputState::Idle
            }
            InputState::RectSelecting(_) => InputState::Idle,
            InputState::Dragging { .. } => {
                actions.push(InputAction::DragFinished);
                InputState::Idle
            }
            other => other,
        };
        actions
    }

    fn on_focus_lost(&mut self) -> Vec<InputAction> {
        self.suppress_gesture = false;
        match std::mem::take(&mut self.state) {
            InputState::Renaming(editor) => vec![editor.finish()],
            dragging @ InputState::Dragging { .. } => {
                self.state = dragging;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Fire due timers: start a pending rename, or advance rect-select
    /// auto-scroll.
    pub fn poll_timers(
        &mut self,
        now: Instant,
        items: &[ItemRecord],
        selection: &mut SelectionModel,
    ) -> Vec<InputAction> {
        let mut actions = Vec::new();
        match &mut self.state {
            InputState::RenamePending {
                id,
                deadline: Some(deadline),
                ..
            } if now >= *deadline => {
                let id = id.clone();
                self.state = InputState::Idle;
                match position_of(items, &id) {
                    Some(index) if selection.is_sole(&id) => {
                        let editor = RenameEditor::new(&items[index]);
                        actions.push(editor.begin_action());
                        self.state = InputState::Renaming(editor);
                    }
                    _ => tracing::trace!(%id, "Pending rename target no longer sole selection"),
                }
            }
            InputState::RectSelecting(rect) => {
                let due = rect.next_tick().is_some_and(|tick| now >= tick);
                if due {
                    if let Some(offset) =
                        rect.tick(now, &mut self.viewport, items, selection, &self.config)
                    {
                        actions.push(InputAction::ScrollTo { offset });
                        actions.push(InputAction::SelectionChanged);
                    }
                }
            }
            _ => {}
        }
        actions
    }

    /// Select the item at `index` and open the rename editor on it,
    /// closing any other rename first.
    pub fn begin_rename(
        &mut self,
        items: &[ItemRecord],
        selection: &mut SelectionModel,
        index: usize,
    ) -> Vec<InputAction> {
        let mut actions: Vec<InputAction> = self.finish_rename().into_iter().collect();
        let Some(item) = items.get(index).filter(|item| item.kind != ItemKind::Drive) else {
            return actions;
        };
        selection.select_index(items, index, false);
        let editor = RenameEditor::new(item);
        actions.push(editor.begin_action());
        self.state = InputState::Renaming(editor);
        actions
    }

    /// Close the rename editor, committing a changed name.
    pub fn commit_rename(&mut self) -> Option<InputAction> {
        self.finish_rename()
    }

    /// Close the rename editor without committing.
    pub fn cancel_rename(&mut self) -> Option<InputAction> {
        match std::mem::take(&mut self.state) {
            InputState::Renaming(editor) => Some(InputAction::CancelRename {
                id: editor.id().clone(),
            }),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// The platform drag ended outside pointer-up handling.
    pub fn drag_finished(&mut self) -> Option<InputAction> {
        match &self.state {
            InputState::Dragging { .. } => {
                self.state = InputState::Idle;
                Some(InputAction::DragFinished)
            }
            _ => None,
        }
    }

    /// Abandon gestures whose item left `items`.
    pub fn sync(&mut self, items: &[ItemRecord]) -> Vec<InputAction> {
        let target = match &self.state {
            InputState::PressedOnItem { id, .. }
            | InputState::DragPending { id, .. }
            | InputState::RenamePending { id, .. } => id,
            InputState::Renaming(editor) => editor.id(),
            _ => return Vec::new(),
        };
        if position_of(items, target).is_some() {
            return Vec::new();
        }

        match std::mem::take(&mut self.state) {
            InputState::Renaming(editor) => vec![InputAction::CancelRename {
                id: editor.id().clone(),
            }],
            _ => Vec::new(),
        }
    }

    fn finish_rename(&mut self) -> Option<InputAction> {
        match std::mem::take(&mut self.state) {
            InputState::Renaming(editor) => Some(editor.finish()),
            other => {
                self.state = other;
                None
            }
        }
    }

    fn beyond_threshold(&self, origin: Point, position: Point) -> bool {
        self.config
            .exceeds_drag_threshold(position.x - origin.x, position.y - origin.y)
    }

    /// Snapshot the selection as a drag payload.
    fn start_drag(
        &mut self,
        items: &[ItemRecord],
        selection: &SelectionModel,
        actions: &mut Vec<InputAction>,
    ) -> InputState {
        self.last_press = None;
        let records = selection.selected_records(items);
        if records.is_empty() {
            return InputState::Idle;
        }
        let effects = DragEffects::for_payload(records.iter().copied());
        let payload: Vec<ItemId> = records.iter().map(|item| item.id.clone()).collect();
        tracing::debug!(count = payload.len(), ?effects, "Starting drag");
        actions.push(InputAction::StartDrag {
            payload: payload.clone(),
            effects,
        });
        InputState::Dragging { payload }
    }
}

fn position_of(items: &[ItemRecord], id: &ItemId) -> Option<usize> {
    items.iter().position(|item| &item.id == id)
}
