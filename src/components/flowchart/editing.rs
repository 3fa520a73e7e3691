//! Inline label editing state.
//!
//! Belongs to the node's view, never to the session: the draft only reaches
//! the model when [`LabelEditor::finish`] hands it back on confirm or blur.

/// How an edit ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditEnd {
	/// Enter pressed.
	Confirm,
	/// Input lost focus.
	Blur,
	/// Escape pressed; the draft is thrown away.
	Cancel,
}

/// Per-node edit toggle plus the in-progress label text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelEditor {
	editing: bool,
	draft: String,
}

impl LabelEditor {
	/// Enters edit mode with the input seeded from the current label.
	pub fn begin(&mut self, current_label: &str) {
		self.editing = true;
		self.draft = current_label.to_string();
	}

	/// Whether the input is shown.
	pub fn is_editing(&self) -> bool {
		self.editing
	}

	/// Text typed so far.
	pub fn draft(&self) -> &str {
		&self.draft
	}

	/// Replaces the draft with the input's current value. Ignored outside edit mode.
	pub fn input(&mut self, value: &str) {
		if self.editing {
			self.draft.clear();
			self.draft.push_str(value);
		}
	}

	/// Leaves edit mode. Returns the label to commit, if any.
	///
	/// A second call (blur fires after Enter hides the input) returns `None`.
	pub fn finish(&mut self, end: EditEnd) -> Option<String> {
		if !self.editing {
			return None;
		}
		self.editing = false;
		let draft = std::mem::take(&mut self.draft);
		match end {
			EditEnd::Confirm | EditEnd::Blur => Some(draft),
			EditEnd::Cancel => None,
		}
	}

	/// Maps a key name to the edit end it triggers.
	pub fn end_for_key(key: &str) -> Option<EditEnd> {
		match key {
			"Enter" => Some(EditEnd::Confirm),
			"Escape" => Some(EditEnd::Cancel),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn begin_seeds_draft_with_label() {
		let mut editor = LabelEditor::default();
		assert!(!editor.is_editing());
		editor.begin("Process");
		assert!(editor.is_editing());
		assert_eq!(editor.draft(), "Process");
	}

	#[test]
	fn confirm_key_exits_and_returns_draft() {
		let mut editor = LabelEditor::default();
		editor.begin("Start");
		editor.input("Begin");
		let end = LabelEditor::end_for_key("Enter").unwrap();
		assert_eq!(editor.finish(end), Some("Begin".to_string()));
		assert!(!editor.is_editing());
		assert_eq!(editor.draft(), "");
	}

	#[test]
	fn blur_exits_edit_mode() {
		let mut editor = LabelEditor::default();
		editor.begin("End");
		assert_eq!(editor.finish(EditEnd::Blur), Some("End".to_string()));
		assert!(!editor.is_editing());
	}

	#[test]
	fn escape_discards_draft() {
		let mut editor = LabelEditor::default();
		editor.begin("End");
		editor.input("Finish");
		assert_eq!(editor.finish(EditEnd::Cancel), None);
		assert!(!editor.is_editing());
	}

	#[test]
	fn blur_after_confirm_is_noop() {
		let mut editor = LabelEditor::default();
		editor.begin("A");
		assert!(editor.finish(EditEnd::Confirm).is_some());
		assert_eq!(editor.finish(EditEnd::Blur), None);
	}

	#[test]
	fn input_ignored_when_not_editing() {
		let mut editor = LabelEditor::default();
		editor.input("stray");
		assert_eq!(editor.draft(), "");
		assert_eq!(LabelEditor::end_for_key("a"), None);
	}
}
