// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! CodeLensCollector visitor: run/debug lenses for RSpec examples and groups.
//!
//! # What is Emitted?
//!
//! - `it` / `example` / `specify`: three lenses (run, run in terminal, debug)
//!   whose `group_id` is the innermost enclosing group
//! - `describe` / `context` with a block, bare or on `RSpec`: three lenses
//!   carrying the group's own `id`, and the group becomes the enclosing group
//!   for everything inside its block
//! - everything else, including `describe` on other receivers: nothing
//!
//! # Usage
//!
//! ```ignore
//! use speclens_core::config::LensConfig;
//! use speclens_ruby::parser::ParsedSource;
//! use speclens_ruby::visitor::{walk_source, CodeLensCollector};
//!
//! let config = LensConfig::new("/project", "/project/spec/user_spec.rb");
//! let mut lenses = Vec::new();
//! let mut collector = CodeLensCollector::new(&config, &mut lenses)?;
//! let parsed = ParsedSource::parse(source)?;
//! walk_source(&mut collector, &parsed);
//! ```

use speclens_core::command::{BaseCommand, CommandBuilder};
use speclens_core::config::LensConfig;
use speclens_core::error::LensResult;
use speclens_core::output::{LensKind, LensRecord, LensSink};
use speclens_core::types::{GroupId, LensLocation};
use speclens_core::workspace::relative_path;

use super::call_site::{CallKind, CallSite};
use super::naming::resolve_name;
use super::traits::{VisitResult, Visitor};

/// Mutable state of one traversal.
///
/// Every entered call pushes a frame recording the group it opened, if any;
/// the matching leave pops that frame and closes exactly that group. Group
/// pushes and pops therefore stay balanced without re-deriving validity at
/// leave time.
#[derive(Debug)]
pub struct TraversalState {
    /// Open groups, innermost last.
    group_stack: Vec<GroupId>,
    /// One entry per entered, not yet left call.
    frames: Vec<Option<GroupId>>,
    /// Next id to hand out.
    next_group_id: GroupId,
    /// Number of unnamed calls seen so far.
    anonymous_count: u32,
}

impl Default for TraversalState {
    fn default() -> Self {
        Self::new()
    }
}

impl TraversalState {
    pub fn new() -> Self {
        TraversalState {
            group_stack: Vec::new(),
            frames: Vec::new(),
            next_group_id: GroupId::FIRST,
            anonymous_count: 0,
        }
    }

    /// Innermost open group.
    pub fn current_group(&self) -> Option<GroupId> {
        self.group_stack.last().copied()
    }

    /// Open groups, outermost first.
    pub fn group_stack(&self) -> &[GroupId] {
        &self.group_stack
    }

    /// Number of groups allocated so far.
    pub fn groups_allocated(&self) -> u32 {
        self.next_group_id.0 - GroupId::FIRST.0
    }

    /// Number of unnamed calls seen so far.
    pub fn anonymous_count(&self) -> u32 {
        self.anonymous_count
    }

    fn open_group(&mut self) -> GroupId {
        let id = self.next_group_id;
        self.next_group_id = id.next();
        self.group_stack.push(id);
        self.frames.push(Some(id));
        id
    }

    fn open_plain(&mut self) {
        self.frames.push(None);
    }

    /// Close the most recently entered call. A leave without a matching
    /// enter is ignored.
    fn close(&mut self) -> Option<GroupId> {
        let id = self.frames.pop().flatten()?;
        let popped = self.group_stack.pop();
        debug_assert_eq!(popped, Some(id));
        Some(id)
    }
}

/// A visitor that turns RSpec examples and groups into lens records.
///
/// One collector covers one traversal of one file; build a new one per file.
pub struct CodeLensCollector<'sink, S: LensSink> {
    /// Workspace-relative path of the file.
    path: String,
    commands: CommandBuilder,
    debug: bool,
    state: TraversalState,
    sink: &'sink mut S,
}

impl<'sink, S: LensSink> CodeLensCollector<'sink, S> {
    /// Create a collector for the file described by `config`.
    ///
    /// Resolves the workspace-relative path and the base command once, up
    /// front.
    ///
    /// # Errors
    ///
    /// Returns `FileOutsideWorkspace` if the file is not under the workspace
    /// root.
    pub fn new(config: &LensConfig, sink: &'sink mut S) -> LensResult<Self> {
        let path = relative_path(config.workspace_root(), &config.file_path)?;
        let base = BaseCommand::resolve(config.command_override.as_deref(), config.workspace_root());
        Ok(Self::with_base_command(path, base, config.debug, sink))
    }

    /// Create a collector from an already-relative path and resolved base
    /// command, without touching the filesystem.
    pub fn with_base_command(
        path: impl Into<String>,
        base: BaseCommand,
        debug: bool,
        sink: &'sink mut S,
    ) -> Self {
        CodeLensCollector {
            path: path.into(),
            commands: CommandBuilder::new(base),
            debug,
            state: TraversalState::new(),
            sink,
        }
    }

    /// Workspace-relative path used in commands.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current traversal state.
    pub fn state(&self) -> &TraversalState {
        &self.state
    }

    fn emit(&mut self, call: &CallSite<'_>, name: &str, group_id: Option<GroupId>, id: Option<GroupId>) {
        let commands = self.commands.build(&self.path, call.line());
        let location = LensLocation::from(&call.range);

        if self.debug {
            tracing::debug!(
                "[CodeLens] {} {:?} at {}:{} -> {}",
                call.method,
                name,
                self.path,
                call.line(),
                commands.runner
            );
        }

        for kind in LensKind::ALL {
            self.sink.push_lens(LensRecord::new(
                kind, &self.path, name, &commands, location, group_id, id,
            ));
        }
    }
}

impl<'src, 'sink, S: LensSink> Visitor<'src> for CodeLensCollector<'sink, S> {
    fn visit_call(&mut self, call: &CallSite<'src>) -> VisitResult {
        match call.kind {
            CallKind::Example => {
                let name = resolve_name(call.first_argument.as_ref(), &mut self.state.anonymous_count);
                let parent = self.state.current_group();
                self.emit(call, &name, parent, None);
                self.state.open_plain();
            }
            CallKind::Group if call.is_framework_group() => {
                let name = resolve_name(call.first_argument.as_ref(), &mut self.state.anonymous_count);
                let parent = self.state.current_group();
                let id = self.state.open_group();
                self.emit(call, &name, parent, Some(id));
            }
            CallKind::Group => {
                if self.debug {
                    tracing::debug!(
                        "[CodeLens] skipping {} at {}:{} (receiver: {:?}, block: {})",
                        call.method,
                        self.path,
                        call.line(),
                        call.receiver,
                        call.has_block
                    );
                }
                self.state.open_plain();
            }
            CallKind::Other => self.state.open_plain(),
        }
        VisitResult::Continue
    }

    fn leave_call(&mut self, _call: &CallSite<'src>) {
        self.state.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsedSource;
    use crate::visitor::dispatch::walk_source;

    const PATH: &str = "spec/widget_spec.rb";

    fn collect(source: &str) -> Vec<LensRecord> {
        collect_with(source, BaseCommand::from_probe(None, false, false)).0
    }

    fn collect_with(source: &str, base: BaseCommand) -> (Vec<LensRecord>, u32, Vec<GroupId>) {
        let parsed = ParsedSource::parse(source).unwrap();
        let mut lenses = Vec::new();
        let mut collector = CodeLensCollector::with_base_command(PATH, base, false, &mut lenses);
        walk_source(&mut collector, &parsed);
        let allocated = collector.state().groups_allocated();
        let stack = collector.state().group_stack().to_vec();
        (lenses, allocated, stack)
    }

    /// (name, group_id, id) of the first record of each triple.
    fn summary(lenses: &[LensRecord]) -> Vec<(String, Option<u32>, Option<u32>)> {
        lenses
            .chunks(3)
            .map(|triple| {
                let data = triple[0].data;
                (
                    triple[0].name().to_string(),
                    data.group_id.map(|g| g.0),
                    data.id.map(|g| g.0),
                )
            })
            .collect()
    }

    mod scenarios {
        use super::*;

        #[test]
        fn group_with_example() {
            let lenses = collect("describe(\"Foo\") { it(\"does x\") {} }");
            assert_eq!(
                summary(&lenses),
                vec![
                    ("Foo".to_string(), None, Some(1)),
                    ("does x".to_string(), Some(1), None),
                ]
            );
        }

        #[test]
        fn string_literal_name() {
            let lenses = collect("it \"does y\" do end");
            assert_eq!(lenses.len(), 3);
            assert!(lenses.iter().all(|l| l.name() == "does y"));
        }

        #[test]
        fn unnamed_examples_count_up() {
            let lenses = collect("it do end\nit do end\n");
            assert_eq!(
                summary(&lenses),
                vec![
                    ("<unnamed-1>".to_string(), None, None),
                    ("<unnamed-2>".to_string(), None, None),
                ]
            );
        }

        #[test]
        fn reference_argument_name() {
            let lenses = collect("describe(MyClass) { }");
            assert_eq!(lenses.len(), 3);
            assert_eq!(lenses[0].name(), "<MyClass>");
            assert_eq!(lenses[0].data.id, Some(GroupId(1)));
        }

        #[test]
        fn foreign_receiver_is_ignored() {
            let (lenses, allocated, stack) = collect_with(
                "Document.describe(\"Foo\") { }",
                BaseCommand::from_probe(None, false, false),
            );
            assert!(lenses.is_empty());
            assert_eq!(allocated, 0);
            assert!(stack.is_empty());
        }

        #[test]
        fn nested_groups() {
            let (lenses, allocated, stack) = collect_with(
                "describe(\"A\"){ describe(\"B\"){ it(\"c\"){} } }",
                BaseCommand::from_probe(None, false, false),
            );
            assert_eq!(
                summary(&lenses),
                vec![
                    ("A".to_string(), None, Some(1)),
                    ("B".to_string(), Some(1), Some(2)),
                    ("c".to_string(), Some(2), None),
                ]
            );
            assert_eq!(allocated, 2);
            assert!(stack.is_empty());
        }
    }

    mod grouping {
        use super::*;

        #[test]
        fn leaving_a_group_restores_parent() {
            let source = r#"
describe "A" do
  context "B" do
    it "b1" do end
  end
  it "a1" do end
end
it "top" do end
"#;
            let lenses = collect(source);
            assert_eq!(
                summary(&lenses),
                vec![
                    ("A".to_string(), None, Some(1)),
                    ("B".to_string(), Some(1), Some(2)),
                    ("b1".to_string(), Some(2), None),
                    ("a1".to_string(), Some(1), None),
                    ("top".to_string(), None, None),
                ]
            );
        }

        #[test]
        fn sibling_groups_get_distinct_ids() {
            let source = r#"
describe "A" do
end
describe "B" do
end
RSpec.describe "C" do
end
"#;
            let ids: Vec<u32> = summary(&collect(source))
                .into_iter()
                .filter_map(|(_, _, id)| id)
                .collect();
            assert_eq!(ids, vec![1, 2, 3]);
        }

        #[test]
        fn rspec_receiver_is_a_group() {
            let lenses = collect("RSpec.describe User do\n  it \"works\" do end\nend\n");
            assert_eq!(
                summary(&lenses),
                vec![
                    ("<User>".to_string(), None, Some(1)),
                    ("works".to_string(), Some(1), None),
                ]
            );
        }

        #[test]
        fn invalid_groups_do_not_shift_numbering_or_nesting() {
            let source = r#"
describe "A" do
  Document.describe "not a group" do
    it "inside foreign" do end
  end
  describe "no block"
  context "B" do
    it "b1" do end
  end
end
"#;
            let lenses = collect(source);
            assert_eq!(
                summary(&lenses),
                vec![
                    ("A".to_string(), None, Some(1)),
                    ("inside foreign".to_string(), Some(1), None),
                    ("B".to_string(), Some(1), Some(2)),
                    ("b1".to_string(), Some(2), None),
                ]
            );
        }

        #[test]
        fn examples_in_helper_blocks_keep_group() {
            let source = r#"
describe "A" do
  [1, 2].each do |n|
    it "handles #{n}" do end
  end
end
"#;
            let lenses = collect(source);
            assert_eq!(
                summary(&lenses),
                vec![
                    ("A".to_string(), None, Some(1)),
                    ("\"handles #{n}\"".to_string(), Some(1), None),
                ]
            );
        }

        #[test]
        fn example_does_not_open_a_group() {
            let source = "it \"outer\" do\n  it \"inner\" do end\nend\n";
            let lenses = collect(source);
            assert_eq!(
                summary(&lenses),
                vec![
                    ("outer".to_string(), None, None),
                    ("inner".to_string(), None, None),
                ]
            );
        }

        #[test]
        fn unnamed_groups_share_the_counter() {
            let source = "describe do\n  it do end\n  it \"named\" do end\nend\n";
            let parsed = ParsedSource::parse(source).unwrap();
            let mut lenses = Vec::new();
            let mut collector = CodeLensCollector::with_base_command(
                PATH,
                BaseCommand::from_probe(None, false, false),
                false,
                &mut lenses,
            );
            walk_source(&mut collector, &parsed);
            assert_eq!(collector.state().anonymous_count(), 2);
            assert_eq!(collector.state().groups_allocated(), 1);

            assert_eq!(
                summary(&lenses),
                vec![
                    ("<unnamed-1>".to_string(), None, Some(1)),
                    ("<unnamed-2>".to_string(), Some(1), None),
                    ("named".to_string(), Some(1), None),
                ]
            );
        }

        #[test]
        fn block_argument_opens_a_group() {
            let source = "describe \"x\", &shared\ndescribe(&shared)\n";
            let (lenses, allocated, stack) =
                collect_with(source, BaseCommand::from_probe(None, false, false));
            assert_eq!(
                summary(&lenses),
                vec![
                    ("x".to_string(), None, Some(1)),
                    ("<unnamed-1>".to_string(), None, Some(2)),
                ]
            );
            assert_eq!(allocated, 2);
            assert!(stack.is_empty());
        }

        #[test]
        fn heredoc_description_names_the_example() {
            let lenses = collect("it <<~DOC do\n  body\nDOC\nend\n");
            assert_eq!(lenses.len(), 3);
            assert!(lenses.iter().all(|l| l.name() == "body"));
            assert_eq!(lenses[0].arguments.command(), "bundle exec rspec spec/widget_spec.rb:1");
        }

        #[test]
        fn unmatched_leave_is_ignored() {
            let mut state = TraversalState::new();
            assert_eq!(state.close(), None);
            let id = state.open_group();
            assert_eq!(state.close(), Some(id));
            assert_eq!(state.close(), None);
            assert!(state.group_stack().is_empty());
        }
    }

    mod records {
        use super::*;

        #[test]
        fn triples_share_name_path_and_location() {
            let lenses = collect("describe \"A\" do\n  it \"x\" do\n  end\nend\n");
            assert_eq!(lenses.len(), 6);
            for triple in lenses.chunks(3) {
                let kinds: Vec<LensKind> = triple.iter().map(|l| l.kind()).collect();
                assert_eq!(kinds, LensKind::ALL.to_vec());
                for record in triple {
                    assert_eq!(record.arguments.path(), PATH);
                    assert_eq!(record.name(), triple[0].name());
                    assert_eq!(record.arguments.location(), triple[0].arguments.location());
                    assert_eq!(record.data.group_id, triple[0].data.group_id);
                    assert_eq!(record.data.id, triple[0].data.id);
                }
            }
        }

        #[test]
        fn titles_and_command_ids() {
            let lenses = collect("it \"x\" do end\n");
            let titles: Vec<&str> = lenses.iter().map(|l| l.title.as_str()).collect();
            assert_eq!(titles, vec!["Run", "Run In Terminal", "Debug"]);
            let commands: Vec<&str> = lenses.iter().map(|l| l.command.as_str()).collect();
            assert_eq!(
                commands,
                vec!["rubyLsp.runTest", "rubyLsp.runTestInTerminal", "rubyLsp.debugTest"]
            );
        }

        #[test]
        fn command_text_uses_one_based_line_and_location_zero_based() {
            let source = "\n\ndescribe \"A\" do\n  it \"x\" do\n  end\nend\n";
            let lenses = collect_with(source, BaseCommand::from_probe(None, true, true)).0;

            let group = &lenses[0..3];
            assert_eq!(group[0].arguments.command(), "bundle exec rspec spec/widget_spec.rb:3");
            assert_eq!(
                group[1].arguments.command(),
                "bundle exec bin/rspec spec/widget_spec.rb:3"
            );
            let location = group[0].arguments.location();
            assert_eq!(location.start_line, 2);
            assert_eq!(location.end_line, 5);
            assert_eq!(location.start_column, 0);
            assert_eq!(location.end_column, 3);

            let example = &lenses[3..6];
            assert_eq!(example[1].arguments.command(), "bundle exec bin/rspec spec/widget_spec.rb:4");
            let location = example[0].arguments.location();
            assert_eq!(location.start_line, 3);
            assert_eq!(location.start_column, 2);
            assert_eq!(location.end_line, 4);
            assert_eq!(location.end_column, 5);
            assert_eq!(example[0].range.start.line, 3);
        }

        #[test]
        fn override_only_changes_terminal_command() {
            let lenses = collect_with(
                "it \"x\" do end\n",
                BaseCommand::from_probe(Some("bin/test"), false, false),
            )
            .0;
            assert_eq!(lenses[0].arguments.command(), "bundle exec rspec spec/widget_spec.rb:1");
            assert_eq!(lenses[1].arguments.command(), "bin/test spec/widget_spec.rb:1");
            assert_eq!(lenses[2].arguments.command(), "bundle exec rspec spec/widget_spec.rb:1");
        }

        #[test]
        fn pending_example_without_block_still_emits() {
            let lenses = collect("it \"is pending\"\n");
            assert_eq!(lenses.len(), 3);
        }

        #[test]
        fn non_test_calls_emit_nothing() {
            let lenses = collect("let(:user) { build(:user) }\nbefore { setup }\n");
            assert!(lenses.is_empty());
        }

        #[test]
        fn debug_flag_does_not_change_output() {
            let source = "describe \"A\" do\n  it \"x\" do end\nend\n";
            let parsed = ParsedSource::parse(source).unwrap();
            let mut lenses = Vec::new();
            let mut collector = CodeLensCollector::with_base_command(
                PATH,
                BaseCommand::from_probe(None, false, false),
                true,
                &mut lenses,
            );
            walk_source(&mut collector, &parsed);
            assert_eq!(lenses, collect(source));
        }
    }

    mod construction {
        use super::*;
        use speclens_core::error::LensError;
        use std::fs;
        use tempfile::TempDir;

        #[test]
        fn new_computes_relative_path_and_probes_root() {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("Gemfile.lock"), "").unwrap();
            let config = LensConfig::new(dir.path(), dir.path().join("spec/models/user_spec.rb"));

            let mut lenses: Vec<LensRecord> = Vec::new();
            let collector = CodeLensCollector::new(&config, &mut lenses).unwrap();
            assert_eq!(collector.path(), "spec/models/user_spec.rb");
            assert_eq!(collector.commands.base().command, "bundle exec rspec");
        }

        #[test]
        fn new_rejects_file_outside_workspace() {
            let dir = TempDir::new().unwrap();
            let other = TempDir::new().unwrap();
            let config = LensConfig::new(dir.path(), other.path().join("foo_spec.rb"));

            let mut lenses: Vec<LensRecord> = Vec::new();
            let result = CodeLensCollector::new(&config, &mut lenses);
            assert!(matches!(result, Err(LensError::FileOutsideWorkspace { .. })));
        }
    }
}
