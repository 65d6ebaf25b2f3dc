//! Drag sessions and drop resolution.
//!
//! A [`DragSession`] turns raw pointer input into at most one [`DragEnd`].
//! [`resolve`] maps a drag end onto the board, producing the move the
//! engine should apply.

use crate::model::{BoardState, ColumnId, TaskId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Observable session state
#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { active: String },
}

/// A completed drag: the dragged id and whatever it was released over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEnd {
    pub active: String,
    pub over: Option<String>,
}

impl DragEnd {
    pub fn new(active: impl Into<String>, over: Option<&str>) -> Self {
        DragEnd {
            active: active.into(),
            over: over.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone)]
struct Press {
    id: String,
    origin: Point,
}

/// Pointer state machine. A press only becomes a drag once the pointer has
/// travelled further than the activation distance.
#[derive(Debug, Clone)]
pub struct DragSession {
    activation_distance: f64,
    press: Option<Press>,
    state: DragState,
}

impl DragSession {
    pub fn new(activation_distance: f64) -> Self {
        DragSession {
            activation_distance,
            press: None,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Pointer down on a draggable entity
    pub fn press(&mut self, id: impl Into<String>, at: Point) {
        self.state = DragState::Idle;
        self.press = Some(Press {
            id: id.into(),
            origin: at,
        });
    }

    pub fn pointer_move(&mut self, to: Point) {
        if self.is_dragging() {
            return;
        }
        if let Some(press) = &self.press
            && press.origin.distance(to) > self.activation_distance
        {
            self.state = DragState::Dragging {
                active: press.id.clone(),
            };
        }
    }

    /// Pointer up. Yields an event only if a drag was in progress.
    pub fn drop(&mut self, over: Option<&str>) -> Option<DragEnd> {
        self.press = None;
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging { active } => Some(DragEnd::new(active, over)),
            DragState::Idle => None,
        }
    }

    pub fn cancel(&mut self) {
        self.press = None;
        self.state = DragState::Idle;
    }
}

/// A resolved move, ready for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragMove {
    Task {
        task_id: TaskId,
        from_column: ColumnId,
        from_index: usize,
        to_column: ColumnId,
        to_index: usize,
    },
    Column {
        column_id: ColumnId,
        from_index: usize,
        to_index: usize,
    },
}

/// Resolve a drag end against the board. `None` means nothing moves.
pub fn resolve(state: &BoardState, end: &DragEnd) -> Option<DragMove> {
    let over = end.over.as_deref()?;
    if over == end.active {
        return None;
    }
    if state.task(&end.active).is_some() {
        resolve_task(state, &end.active, over)
    } else if state.column(&end.active).is_some() {
        resolve_column(state, &end.active, over)
    } else {
        None
    }
}

fn resolve_task(state: &BoardState, active: &str, over: &str) -> Option<DragMove> {
    let (from_column, from_index) = state.task_location(active)?;
    let (to_column, mut to_index) = if let Some(location) = state.task_location(over) {
        location
    } else {
        let column = state.column(over)?;
        (column.id.clone(), state.ordered_tasks(over).len())
    };

    if from_column == to_column {
        // the task leaves its slot before being reinserted
        let last = state.ordered_tasks(to_column.as_str()).len().saturating_sub(1);
        to_index = to_index.min(last);
        if to_index == from_index {
            return None;
        }
    }

    Some(DragMove::Task {
        task_id: TaskId::from(active),
        from_column,
        from_index,
        to_column,
        to_index,
    })
}

fn resolve_column(state: &BoardState, active: &str, over: &str) -> Option<DragMove> {
    let column = state.column(active)?;
    let target = match state.task(over) {
        Some(task) => task.column_id.as_str(),
        None => over,
    };
    let target_column = state.column(target)?;
    if target_column.project_id != column.project_id {
        return None;
    }
    let from_index = state.column_index(active)?;
    let to_index = state.column_index(target)?;
    if from_index == to_index {
        return None;
    }
    Some(DragMove::Column {
        column_id: column.id.clone(),
        from_index,
        to_index,
    })
}
