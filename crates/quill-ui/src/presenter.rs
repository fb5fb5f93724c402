//! Drives a [`TextBox`] from a branching story.
//!
//! Each node's `say` block is queued one line per press. Once the block has fully
//! revealed, the node's choices open in the choice panel; picking one moves on to
//! the destination node.

use quill_core::alloc::HashMap;

use crate::text_box::TextBox;

/// An option offered at the end of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub id: String,
    pub text: String,
    /// Destination node; `None` marks an unfinished branch.
    pub goto: Option<String>,
}

impl Choice {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            goto: None,
        }
    }

    pub fn goto(mut self, node: impl Into<String>) -> Self {
        self.goto = Some(node.into());
        self
    }

    /// Text shown in the choice panel.
    pub fn label(&self) -> String {
        let text = if self.text.is_empty() {
            &self.id
        } else {
            &self.text
        };
        match self.goto {
            Some(_) => format!("> {text}"),
            None => format!("> {text} [WIP]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    /// Dialogue block, one line per line break.
    pub say: String,
    pub choices: Vec<Choice>,
}

impl Node {
    pub fn new(id: impl Into<String>, say: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            say: say.into(),
            choices: Vec::new(),
        }
    }

    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Story {
    pub nodes: HashMap<String, Node>,
    pub start: String,
}

impl Story {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            nodes: HashMap::default(),
            start: start.into(),
        }
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.add_node(node);
        self
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }
}

/// How nodes accumulate in the text box.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenterConfig {
    /// Clear the box every `n` nodes; 0 clears on every node.
    pub clear_after_nodes: usize,
    /// Insert `separator_text` between nodes that share the box.
    pub insert_node_separator: bool,
    pub separator_text: String,
    /// Oldest lines beyond this count are trimmed.
    pub max_visible_entries: Option<usize>,
    /// Echo picked choices into the transcript.
    pub echo_choices: bool,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            clear_after_nodes: 0,
            insert_node_separator: true,
            separator_text: String::new(),
            max_visible_entries: None,
            echo_choices: true,
        }
    }
}

impl PresenterConfig {
    fn keeps_transcript(&self) -> bool {
        self.clear_after_nodes > 0
    }
}

pub struct NodePresenter {
    story: Story,
    config: PresenterConfig,
    current: Option<String>,
    choices: Vec<Choice>,
    labels: Vec<String>,
    choices_shown: bool,
    nodes_since_clear: usize,
}

impl NodePresenter {
    pub fn new(story: Story, config: PresenterConfig) -> Self {
        Self {
            story,
            config,
            current: None,
            choices: Vec::new(),
            labels: Vec::new(),
            choices_shown: false,
            nodes_since_clear: 0,
        }
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    pub fn current_node(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn choices_shown(&self) -> bool {
        self.choices_shown
    }

    /// Show the story's start node.
    pub fn start(&mut self, tb: &mut TextBox) -> bool {
        let start = self.story.start.clone();
        self.show_node(tb, &start)
    }

    pub fn show_node(&mut self, tb: &mut TextBox, node_id: &str) -> bool {
        let Some(node) = self.story.node(node_id).cloned() else {
            tracing::warn!("Unknown story node {:?}", node_id);
            return false;
        };
        tracing::debug!("Presenting node {:?}", node.id);

        tb.hide_choice_box();
        if !self.config.keeps_transcript() || self.nodes_since_clear >= self.config.clear_after_nodes {
            tb.clear();
            self.nodes_since_clear = 0;
        } else if self.config.insert_node_separator && !tb.visible_entries().is_empty() {
            tb.append_line(&self.config.separator_text, false, false);
        }
        self.nodes_since_clear += 1;

        tb.set_follow_bottom(true);
        tb.queue_lines(&node.say, true);

        self.labels = node.choices.iter().map(Choice::label).collect();
        self.choices = node.choices;
        self.choices_shown = self.choices.is_empty();
        self.current = Some(node.id);

        tb.scroll_to_bottom();
        if let Some(max) = self.config.max_visible_entries {
            let excess = tb.visible_entries().len().saturating_sub(max);
            if excess > 0 {
                tb.trim_front(excess);
            }
        }
        true
    }

    /// Open the choice panel once the node's dialogue has fully revealed.
    pub fn update(&mut self, tb: &mut TextBox) {
        if self.choices_shown || self.labels.is_empty() {
            return;
        }
        if tb.is_settled() {
            tb.show_choice_box(self.labels.clone());
            self.choices_shown = true;
        }
    }

    /// Follow the choice at `index`. Unfinished and unknown destinations are ignored.
    pub fn submit_choice_index(&mut self, tb: &mut TextBox, index: usize) -> bool {
        if !self.choices_shown {
            return false;
        }
        let Some(choice) = self.choices.get(index).cloned() else {
            return false;
        };
        let Some(target) = choice.goto.as_deref() else {
            tracing::debug!("Choice {:?} has no destination yet", choice.id);
            return false;
        };
        if self.story.node(target).is_none() {
            tracing::warn!("Choice {:?} points at unknown node {:?}", choice.id, target);
            return false;
        }

        if self.config.keeps_transcript() && self.config.echo_choices {
            tb.hide_choice_box();
            tb.append_player_choice(&choice.label());
        }
        self.show_node(tb, target)
    }

    /// Follow the currently selected choice.
    pub fn submit_selected(&mut self, tb: &mut TextBox) -> bool {
        match tb.choice_selected_index() {
            Some(index) => self.submit_choice_index(tb, index),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_labels() {
        assert_eq!(Choice::new("go", "Go left").goto("left").label(), "> Go left");
        assert_eq!(Choice::new("wait", "Wait").label(), "> Wait [WIP]");
        assert_eq!(Choice::new("id_only", "").goto("x").label(), "> id_only");
    }

    #[test]
    fn test_story_lookup() {
        let story = Story::new("a")
            .with_node(Node::new("a", "Hi").with_choice(Choice::new("c", "Next").goto("b")))
            .with_node(Node::new("b", "Bye"));
        assert_eq!(story.node("a").unwrap().choices.len(), 1);
        assert!(story.node("missing").is_none());
    }
}
