// Modal system for TUI overlays
//
// Self-contained modal dialogs that handle their own input and return actions.
// App just holds Option<Modal>, input routing acts on returned ModalAction.
//
// The session detail overlay is not here: its lifecycle lives in the store
// so the controller can guard late responses against it.

use crate::api::models::{AttackType, ThreatLevel};
use crate::api::query::SortSpec;
use crate::store::FilterInput;
use crossterm::event::KeyCode;

/// Actions returned by modal input handling
#[derive(Debug, Clone, PartialEq)]
pub enum ModalAction {
    /// Input consumed, no state change needed
    None,
    Close,
    /// Apply the filter form
    Submit(FilterInput),
}

/// Available modal types
#[derive(Debug, Clone)]
pub enum Modal {
    /// Keyboard shortcuts
    Help,
    /// Session filter form
    Filter(FilterForm),
}

impl Modal {
    pub fn help() -> Self {
        Modal::Help
    }

    /// Filter form pre-filled with the current filters
    pub fn filter(input: FilterInput) -> Self {
        Modal::Filter(FilterForm::new(input))
    }

    /// Handle keyboard input, return action for caller to execute
    pub fn handle_input(&mut self, key: KeyCode) -> ModalAction {
        match self {
            Modal::Help => match key {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => ModalAction::Close,
                _ => ModalAction::None,
            },
            Modal::Filter(form) => form.handle_input(key),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Filter form
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    ThreatLevel,
    AttackType,
    MinRisk,
    PeerIp,
    SessUuid,
    Sort,
}

impl FilterField {
    pub const ALL: [FilterField; 6] = [
        FilterField::ThreatLevel,
        FilterField::AttackType,
        FilterField::MinRisk,
        FilterField::PeerIp,
        FilterField::SessUuid,
        FilterField::Sort,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::ThreatLevel => "Threat level",
            Self::AttackType => "Attack type",
            Self::MinRisk => "Min risk",
            Self::PeerIp => "Peer IP",
            Self::SessUuid => "Session UUID",
            Self::Sort => "Sort",
        }
    }

    /// Choice fields cycle with ←/→; the rest take typed text
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::ThreatLevel | Self::AttackType | Self::Sort)
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Editable filter form state
#[derive(Debug, Clone)]
pub struct FilterForm {
    pub input: FilterInput,
    pub focus: FilterField,
}

impl FilterForm {
    pub fn new(mut input: FilterInput) -> Self {
        if input.sort.trim().is_empty() {
            input.sort = SortSpec::default().token();
        }
        Self {
            input,
            focus: FilterField::ThreatLevel,
        }
    }

    /// Current value of a field as typed
    pub fn value(&self, field: FilterField) -> &str {
        match field {
            FilterField::ThreatLevel => &self.input.threat_level,
            FilterField::AttackType => &self.input.attack_type,
            FilterField::MinRisk => &self.input.min_risk,
            FilterField::PeerIp => &self.input.peer_ip,
            FilterField::SessUuid => &self.input.sess_uuid,
            FilterField::Sort => &self.input.sort,
        }
    }

    fn value_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::ThreatLevel => &mut self.input.threat_level,
            FilterField::AttackType => &mut self.input.attack_type,
            FilterField::MinRisk => &mut self.input.min_risk,
            FilterField::PeerIp => &mut self.input.peer_ip,
            FilterField::SessUuid => &mut self.input.sess_uuid,
            FilterField::Sort => &mut self.input.sort,
        }
    }

    /// Options for a choice field; an empty string means "any"
    fn choices(field: FilterField) -> Vec<String> {
        match field {
            FilterField::ThreatLevel => std::iter::once(String::new())
                .chain(ThreatLevel::ALL.iter().map(|l| l.as_str().to_string()))
                .collect(),
            FilterField::AttackType => std::iter::once(String::new())
                .chain(AttackType::ALL.iter().map(|a| a.as_str().to_string()))
                .collect(),
            FilterField::Sort => SortSpec::CHOICES.iter().map(SortSpec::token).collect(),
            _ => Vec::new(),
        }
    }

    fn cycle(&mut self, forward: bool) {
        let field = self.focus;
        let choices = Self::choices(field);
        if choices.is_empty() {
            return;
        }
        let current = self.value(field);
        let idx = choices
            .iter()
            .position(|c| c.eq_ignore_ascii_case(current))
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % choices.len()
        } else {
            (idx + choices.len() - 1) % choices.len()
        };
        *self.value_mut(field) = choices[next].clone();
    }

    pub fn handle_input(&mut self, key: KeyCode) -> ModalAction {
        match key {
            KeyCode::Esc => ModalAction::Close,
            KeyCode::Enter => ModalAction::Submit(self.input.clone()),
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                ModalAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                ModalAction::None
            }
            KeyCode::Right if self.focus.is_choice() => {
                self.cycle(true);
                ModalAction::None
            }
            KeyCode::Left if self.focus.is_choice() => {
                self.cycle(false);
                ModalAction::None
            }
            KeyCode::Backspace if !self.focus.is_choice() => {
                self.value_mut(self.focus).pop();
                ModalAction::None
            }
            KeyCode::Char(c) if !self.focus.is_choice() => {
                self.value_mut(self.focus).push(c);
                ModalAction::None
            }
            _ => ModalAction::None,
        }
    }
}
