/// One displayable image of a mounted gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryImage {
    pub src: String,
    pub alt: String,
}

/// Navigation state over a fixed ordered image set. Scoped to one mounted
/// gallery; nothing persists across instances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryState {
    pub current_index: usize,
    pub images: Vec<GalleryImage>,
    pub last_user_interaction_ms: i64,
}

impl GalleryState {
    pub fn with_images(images: Vec<GalleryImage>) -> Self {
        Self {
            images,
            ..Default::default()
        }
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn current(&self) -> Option<&GalleryImage> {
        self.images.get(self.current_index)
    }
}

#[derive(Debug, Clone)]
pub enum GalleryAction {
    Next,
    Previous,
    SetIndex(usize),
    UserNext { at_ms: i64 },
    UserPrevious { at_ms: i64 },
    UserSetIndex { index: usize, at_ms: i64 },
    /// Auto-advance tick. Advances one step only when the debounce window
    /// since the last user interaction has fully elapsed.
    CycleNext { at_ms: i64, interval_ms: i64 },
}

pub fn reduce_gallery(mut state: GalleryState, action: GalleryAction) -> GalleryState {
    // Empty galleries never navigate; modulo by zero is the failure mode
    // being guarded here.
    if state.images.is_empty() {
        return state;
    }

    match action {
        GalleryAction::Next => advance(&mut state, 1),
        GalleryAction::Previous => retreat(&mut state),
        GalleryAction::SetIndex(index) => set_index(&mut state, index),

        GalleryAction::UserNext { at_ms } => {
            advance(&mut state, 1);
            state.last_user_interaction_ms = at_ms;
        }
        GalleryAction::UserPrevious { at_ms } => {
            retreat(&mut state);
            state.last_user_interaction_ms = at_ms;
        }
        GalleryAction::UserSetIndex { index, at_ms } => {
            set_index(&mut state, index);
            state.last_user_interaction_ms = at_ms;
        }

        GalleryAction::CycleNext { at_ms, interval_ms } => {
            if at_ms - state.last_user_interaction_ms >= interval_ms {
                advance(&mut state, 1);
            }
        }
    }
    state
}

fn advance(state: &mut GalleryState, by: usize) {
    state.current_index = (state.current_index + by) % state.images.len();
}

fn retreat(state: &mut GalleryState) {
    let count = state.images.len();
    state.current_index = (state.current_index + count - 1) % count;
}

fn set_index(state: &mut GalleryState, index: usize) {
    if index < state.images.len() {
        state.current_index = index;
    }
}
