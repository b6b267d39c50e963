//! termtree rendering of a breed plan, root first, each node followed by
//! the pair that breeds into it.

use colored::Colorize;
use itertools::Itertools;
use termtree::Tree;

use crate::application::services::BreedPlan;
use crate::domain::{held_item, BreedError, Position, TreeNode};

pub trait TreeViewConvert {
    fn to_tree_view(&self) -> Tree<String>;
}

impl TreeViewConvert for BreedPlan {
    fn to_tree_view(&self) -> Tree<String> {
        build_view(self, Position::ROOT)
    }
}

fn build_view(plan: &BreedPlan, position: Position) -> Tree<String> {
    let Some(node) = plan.tree().get(position) else {
        return Tree::new(format!("[{}] missing", position));
    };
    let mut view = Tree::new(node_label(plan, node));
    if let Some(sources) = plan.tree().sources(position) {
        for source in sources {
            view.push(build_view(plan, source.position()));
        }
    }
    view
}

fn node_label(plan: &BreedPlan, node: &TreeNode) -> String {
    let mut parts = Vec::new();

    let who = if node.species.is_some() {
        node.to_string().bold().to_string()
    } else {
        node.to_string().dimmed().to_string()
    };
    parts.push(who);

    let mut traits = node.ivs().iter().map(|iv| iv.abbreviation().to_string()).collect_vec();
    if let Some(nature) = node.nature() {
        traits.push(nature.to_string());
    }
    if !traits.is_empty() {
        parts.push(traits.join("/").cyan().to_string());
    }

    if let Some(item) = held_item(plan.tree(), node.position()) {
        parts.push(format!("holds {}", item).yellow().to_string());
    }
    if node.gender_cost_ignored {
        parts.push("gender cost ignored".dimmed().to_string());
    }

    if let Some(errors) = plan.errors().get(&node.position()) {
        let shown = errors
            .iter()
            .filter(|e| e.is_reportable())
            .map(BreedError::to_string)
            .join("; ");
        if !shown.is_empty() {
            parts.push(shown.red().to_string());
        }
    }

    parts.join("  ")
}
