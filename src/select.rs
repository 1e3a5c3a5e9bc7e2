//! Interactive target selection
//!
//! Targets are grouped per subscription. A subscription with several VMs gets
//! one indexed choice per VM (`&1 vm-a`, `&2 vm-b`); a subscription with a
//! single VM is offered under its own name.

use crate::discovery::BastionTarget;
use crate::error::Result;
use crate::terminal::Terminal;

/// One selectable entry of the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<'a> {
    pub subscription: &'a str,
    /// 1-based position within a subscription that has several VMs
    pub index: Option<usize>,
    /// Label in hotkey notation: `&` marks the accelerator of indexed entries
    pub label: String,
    pub target: &'a BastionTarget,
}

impl<'a> Choice<'a> {
    fn single(subscription: &'a str, target: &'a BastionTarget) -> Self {
        Self {
            subscription,
            index: None,
            label: subscription.trim().to_string(),
            target,
        }
    }

    fn indexed(subscription: &'a str, index: usize, target: &'a BastionTarget) -> Self {
        Self {
            subscription,
            index: Some(index),
            label: format!("&{index} {}", target.vm_name),
            target,
        }
    }

    /// How the choice is rendered in the menu
    pub fn menu_text(&self) -> String {
        match self.index {
            Some(index) => format!("{}  [{index}] {}", self.subscription, self.target.vm_name),
            None => self.label.clone(),
        }
    }
}

/// Build the menu choices for targets already ordered by subscription
pub fn build_choices(targets: &[BastionTarget]) -> Vec<Choice<'_>> {
    let mut groups: Vec<(&str, Vec<&BastionTarget>)> = Vec::new();
    for target in targets {
        let name = target.subscription_name.as_str();
        match groups.iter_mut().find(|(group, _)| *group == name) {
            Some((_, members)) => members.push(target),
            None => groups.push((name, vec![target])),
        }
    }

    let mut choices = Vec::with_capacity(targets.len());
    for (subscription, members) in groups {
        if let [only] = members.as_slice() {
            choices.push(Choice::single(subscription, *only));
            continue;
        }

        for (position, target) in members.into_iter().enumerate() {
            choices.push(Choice::indexed(subscription, position + 1, target));
        }
    }
    choices
}

/// Ask the operator to pick a target. `None` when the prompt was cancelled.
pub fn select_target<'a>(
    terminal: &dyn Terminal,
    targets: &'a [BastionTarget],
) -> Result<Option<&'a BastionTarget>> {
    let choices = build_choices(targets);
    let items: Vec<String> = choices.iter().map(Choice::menu_text).collect();

    let selection = terminal.choose("Select the VM to connect to", &items)?;
    Ok(selection.and_then(|index| choices.get(index)).map(|choice| choice.target))
}
