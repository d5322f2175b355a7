use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Buy,
    Rent,
    Edit,
    Message,
    Cart,
}

impl ModalKind {
    pub fn from_param(param: &str) -> Option<ModalKind> {
        match param {
            "buy" => Some(ModalKind::Buy),
            "rent" => Some(ModalKind::Rent),
            "edit" => Some(ModalKind::Edit),
            "message" => Some(ModalKind::Message),
            "cart" => Some(ModalKind::Cart),
            _ => None,
        }
    }

    /// Whether this modal targets a specific product.
    pub fn needs_target(&self) -> bool {
        !matches!(self, ModalKind::Cart)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modal {
    pub kind: ModalKind,
    pub target: Option<Uuid>,
}

/// At most one modal is open at a time, keyed by the currently targeted
/// product id. Opening another modal replaces the current one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalState {
    open: Option<Modal>,
}

impl ModalState {
    pub fn open(kind: ModalKind, target: Option<Uuid>) -> ModalState {
        // a target-keyed modal without a target stays closed
        if kind.needs_target() && target.is_none() {
            return ModalState::default();
        }
        ModalState {
            open: Some(Modal { kind, target }),
        }
    }

    pub fn closed() -> ModalState {
        ModalState::default()
    }

    pub fn current(&self) -> Option<Modal> {
        self.open
    }

    /// Parse from the `modal` / `target` query parameters. Anything
    /// unrecognized renders as no modal.
    pub fn from_params(modal: Option<&str>, target: Option<&str>) -> ModalState {
        let Some(kind) = modal.and_then(ModalKind::from_param) else {
            return ModalState::default();
        };
        let target = target.and_then(|t| t.parse().ok());
        ModalState::open(kind, target)
    }
}
