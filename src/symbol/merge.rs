//! Folding a per-document tree into the project-wide tree.

use super::SymbolTree;
use super::insert::DeclarationSite;
use crate::debug_print;
use crate::diagnostics::Diagnostic;
use crate::error::SymbolResult;
use crate::lookup::LookupFlags;
use crate::types::{Location, SymbolId};
use std::collections::{HashMap, HashSet};

/// Bookkeeping for one `merge_with` call.
#[derive(Default)]
struct MergeState<'d> {
    docnames: HashSet<&'d str>,
    /// Their node id to ours, for matched and imported nodes alike
    remap: HashMap<SymbolId, SymbolId>,
    imported: Vec<SymbolId>,
    diagnostics: Vec<Diagnostic>,
}

impl SymbolTree {
    /// Merge every top-level child of `other` into this tree.
    ///
    /// Declarations in `other` are only reconciled against ours when their
    /// document is one of `docnames`. Nothing is ever removed: nodes are
    /// appended, placeholders are filled, or matching nodes are recursed into.
    /// Conflicts come back as diagnostics.
    pub fn merge_with(&mut self, mut other: SymbolTree, docnames: &[&str]) -> SymbolResult<Vec<Diagnostic>> {
        let mut state = MergeState {
            docnames: docnames.iter().copied().collect(),
            ..MergeState::default()
        };
        let (ours, theirs) = (self.root(), other.root());
        state.remap.insert(theirs, ours);

        {
            let _span = self.trace().debug_lookup.then(|| {
                tracing::debug_span!(target: "cppsym::lookup", "merge_with", docnames = ?docnames).entered()
            });
            self.merge_children(ours, &mut other, theirs, &mut state)?;
        }

        // imported nodes still point at siblings by their old ids
        for &id in &state.imported {
            let node = &mut self.nodes[id.index()];
            node.sibling_above = node.sibling_above.and_then(|s| state.remap.get(&s).copied());
            node.sibling_below = node.sibling_below.and_then(|s| state.remap.get(&s).copied());
        }
        for &id in &state.imported {
            self.assert_invariants(id)?;
        }

        if self.trace().debug_show_tree {
            tracing::debug!(target: "cppsym::tree", "tree after merge:\n{}", self.dump(ours, 0));
        }
        Ok(state.diagnostics)
    }

    fn merge_children(
        &mut self,
        ours: SymbolId,
        other: &mut SymbolTree,
        theirs: SymbolId,
        state: &mut MergeState<'_>,
    ) -> SymbolResult<()> {
        let their_children = other.children(theirs).to_vec();
        for their_child in their_children {
            let incoming = other.symbol(their_child);

            if incoming.is_redeclaration {
                debug_print!(self, "importing redeclaration {their_child}");
                self.import_subtree(other, their_child, ours, state);
                continue;
            }

            let candidates: Vec<SymbolId> = match &incoming.ident_or_op {
                Some(ident) => self
                    .find_named_symbols(
                        ours,
                        ident,
                        incoming.template_params.as_ref(),
                        incoming.template_args.as_ref(),
                        LookupFlags::empty(),
                    )
                    .filter(|&s| !self.symbol(s).is_redeclaration)
                    .collect(),
                None => Vec::new(),
            };

            let chosen = match &incoming.declaration {
                None => candidates.first().copied(),
                Some(theirs_decl) => {
                    let wanted = theirs_decl.stable_id();
                    let mut empty = None;
                    let mut same = None;
                    for &candidate in &candidates {
                        match self.symbol(candidate).declaration() {
                            None => empty = Some(candidate),
                            Some(d) if d.stable_id() == wanted => {
                                same = Some(candidate);
                                break;
                            }
                            Some(_) => {}
                        }
                    }
                    same.or(empty)
                }
            };
            let Some(our_child) = chosen else {
                debug_print!(self, "no counterpart for {their_child}, importing");
                self.import_subtree(other, their_child, ours, state);
                continue;
            };
            debug_print!(self, "merging {their_child} into {our_child}");

            self.reconcile_declaration(our_child, other, their_child, state)?;
            state.remap.insert(their_child, our_child);
            self.merge_children(our_child, other, their_child, state)?;
        }
        Ok(())
    }

    fn reconcile_declaration(
        &mut self,
        our_child: SymbolId,
        other: &SymbolTree,
        their_child: SymbolId,
        state: &mut MergeState<'_>,
    ) -> SymbolResult<()> {
        let incoming = other.symbol(their_child);
        let (Some(their_decl), Some(their_doc), Some(their_line)) =
            (&incoming.declaration, &incoming.docname, incoming.line)
        else {
            return Ok(());
        };
        if !state.docnames.contains(&**their_doc) {
            return Ok(());
        }

        let ours = self.symbol(our_child);
        let Some(our_decl) = &ours.declaration else {
            return self.fill_empty(
                our_child,
                DeclarationSite::new(their_decl.clone(), their_doc, their_line),
            );
        };
        let existing = ours.location().unwrap_or_else(|| Location::new("", 0));
        let duplicate = Location::new(their_doc, their_line);

        if ours.docname.as_deref() != Some(&**their_doc) {
            let diagnostic = Diagnostic::DuplicateDeclaration {
                declaration: our_decl.to_string(),
                directive: our_decl.directive_type,
                existing,
                duplicate,
            };
            state.diagnostics.push(diagnostic.raise());
            return Ok(());
        }

        // same document on both sides: parameter nodes recreated for a
        // placeholder we just filled are expected
        let parent_decl = |tree: &SymbolTree, id: SymbolId| {
            tree.symbol(id)
                .parent
                .and_then(|p| tree.symbol(p).declaration.clone())
        };
        let benign = our_decl.object_type == their_decl.object_type
            && their_decl.object_type.is_parameter()
            && parent_decl(self, our_child) == parent_decl(other, their_child);
        if !benign {
            let diagnostic = Diagnostic::MergeInconsistency {
                ours: our_decl.to_string(),
                theirs: their_decl.to_string(),
                location: duplicate,
            };
            state.diagnostics.push(diagnostic.raise());
        }
        Ok(())
    }

    /// Move `theirs` and its subtree out of `other` and append it under `parent`.
    fn import_subtree(
        &mut self,
        other: &mut SymbolTree,
        theirs: SymbolId,
        parent: SymbolId,
        state: &mut MergeState<'_>,
    ) {
        let mut node = std::mem::replace(&mut other.nodes[theirs.index()], super::Symbol::root());
        let children = std::mem::take(&mut node.children);
        node.parent = Some(parent);

        let id = self.push(node);
        state.remap.insert(theirs, id);
        state.imported.push(id);
        for child in children {
            self.import_subtree(other, child, id, state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Declaration, FunctionParam, NestedName, ObjectType};
    use crate::symbol::AddOutcome;

    fn decl(kind: ObjectType, name: &str) -> Declaration {
        Declaration::new(kind, NestedName::parse(name).unwrap())
    }

    fn tree_with(decls: &[(ObjectType, &str)], doc: &str) -> SymbolTree {
        let mut tree = SymbolTree::default();
        let root = tree.root();
        for (i, (kind, name)) in decls.iter().enumerate() {
            tree.add_declaration(root, decl(*kind, name), doc, i as u32 + 1)
                .unwrap();
        }
        tree
    }

    fn declared(tree: &SymbolTree) -> Vec<String> {
        tree.all_symbols()
            .filter_map(|id| {
                let node = tree.symbol(id);
                Some(format!("{}@{}", node.declaration()?, node.docname()?))
            })
            .collect()
    }

    #[test]
    fn test_merge_empty_tree_is_noop() {
        let mut tree = tree_with(&[(ObjectType::Class, "N::A")], "a");
        let before = tree.dump(tree.root(), 0);
        let diags = tree.merge_with(SymbolTree::default(), &["a"]).unwrap();
        assert!(diags.is_empty());
        assert_eq!(tree.dump(tree.root(), 0), before);
    }

    #[test]
    fn test_merge_imports_new_subtrees() {
        let mut ours = tree_with(&[(ObjectType::Class, "N::A")], "a");
        let theirs = tree_with(&[(ObjectType::Function, "N::B::f"), (ObjectType::Class, "M::C")], "b");

        let diags = ours.merge_with(theirs, &["b"]).unwrap();
        assert!(diags.is_empty());
        assert_eq!(
            declared(&ours),
            vec!["N::A@a", "N::B::f()@b", "M::C@b"]
        );
        // N was matched, not duplicated
        assert_eq!(ours.children(ours.root()).len(), 2);
        ours.assert_all_invariants().unwrap();
    }

    #[test]
    fn test_merge_fills_placeholder() {
        let mut ours = tree_with(&[(ObjectType::Function, "C::f")], "a");
        let theirs = tree_with(&[(ObjectType::Class, "C")], "b");
        let placeholder = ours.children(ours.root())[0];

        let diags = ours.merge_with(theirs, &["b"]).unwrap();
        assert!(diags.is_empty());
        assert_eq!(ours.symbol(placeholder).docname(), Some("b"));
        assert_eq!(ours.children(ours.root()).len(), 1);
    }

    #[test]
    fn test_merge_reports_cross_document_duplicate() {
        let mut ours = tree_with(&[(ObjectType::Class, "A")], "a");
        let theirs = tree_with(&[(ObjectType::Class, "A")], "b");

        let diags = ours.merge_with(theirs, &["b"]).unwrap();
        assert_eq!(diags.len(), 1);
        let Diagnostic::DuplicateDeclaration {
            existing, duplicate, ..
        } = &diags[0]
        else {
            panic!("expected duplicate declaration");
        };
        assert_eq!(existing, &Location::new("a", 1));
        assert_eq!(duplicate, &Location::new("b", 1));
        // our declaration is untouched
        assert_eq!(declared(&ours), vec!["A@a"]);
    }

    #[test]
    fn test_merge_ignores_documents_not_affected() {
        let mut ours = tree_with(&[(ObjectType::Class, "A")], "a");
        let theirs = tree_with(&[(ObjectType::Class, "A")], "b");
        let diags = ours.merge_with(theirs, &["c"]).unwrap();
        assert!(diags.is_empty());
        assert_eq!(declared(&ours), vec!["A@a"]);
    }

    #[test]
    fn test_merge_keeps_overloads_apart() {
        let f = |ty: &str| {
            decl(ObjectType::Function, "f").with_function_params(vec![FunctionParam::new(ty, None)])
        };
        let mut ours = SymbolTree::default();
        let root = ours.root();
        ours.add_declaration(root, f("int"), "a", 1).unwrap();
        let mut theirs = SymbolTree::default();
        let root = theirs.root();
        theirs.add_declaration(root, f("double"), "b", 1).unwrap();

        let diags = ours.merge_with(theirs, &["b"]).unwrap();
        assert!(diags.is_empty());
        assert_eq!(ours.children(ours.root()).len(), 2);
    }

    #[test]
    fn test_merge_appends_redeclarations_and_remaps_siblings() {
        let mut ours = SymbolTree::default();
        let mut theirs = tree_with(&[(ObjectType::Class, "A")], "b");
        let root = theirs.root();
        let dup = theirs
            .add_declaration(root, decl(ObjectType::Class, "A"), "b", 2)
            .unwrap();
        let g = theirs
            .add_declaration(root, decl(ObjectType::Function, "g"), "b", 3)
            .unwrap()
            .symbol();
        let AddOutcome::Duplicate { redeclaration, .. } = dup else {
            panic!("expected duplicate");
        };
        theirs.link_siblings(redeclaration, g).unwrap();

        ours.merge_with(theirs, &["b"]).unwrap();
        let kids = ours.children(ours.root()).to_vec();
        assert_eq!(kids.len(), 3);
        let redecl = kids
            .iter()
            .copied()
            .find(|&k| ours.symbol(k).is_redeclaration())
            .unwrap();
        let below = ours.symbol(redecl).sibling_below().unwrap();
        assert_eq!(ours.symbol(below).ident_or_op().unwrap().to_string(), "g");
        assert_eq!(ours.symbol(below).sibling_above(), Some(redecl));
    }
}
