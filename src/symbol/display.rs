//! Human-readable rendering of nodes and whole subtrees.

use super::SymbolTree;
use crate::types::SymbolId;

impl SymbolTree {
    /// One line describing `id`, indented by `indent` tabs.
    pub fn render_symbol(&self, id: SymbolId, indent: usize) -> String {
        let node = self.symbol(id);
        let mut out = "\t".repeat(indent);

        match node.parent {
            None => out.push_str("::"),
            Some(_) => {
                if let Some(params) = &node.template_params {
                    out.push_str(&params.to_string());
                    out.push(' ');
                }
                if let Some(ident) = &node.ident_or_op {
                    out.push_str(&ident.to_string());
                }
                if let Some(args) = &node.template_args {
                    out.push_str(&args.to_string());
                }
            }
        }

        if let Some(declaration) = &node.declaration {
            out.push_str(": ");
            if node.is_redeclaration {
                out.push_str("!!duplicate!! ");
            }
            out.push('{');
            out.push_str(declaration.object_type.as_str());
            out.push_str("} ");
            out.push_str(&declaration.to_string());
        }

        if let Some(docname) = &node.docname {
            out.push_str("\t(");
            out.push_str(docname);
            out.push(')');
        }
        out
    }

    /// `id` and everything below it, one node per line.
    pub fn dump(&self, id: SymbolId, indent: usize) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, id, indent);
        out
    }

    fn dump_into(&self, out: &mut String, id: SymbolId, indent: usize) {
        out.push_str(&self.render_symbol(id, indent));
        out.push('\n');
        for &child in self.children(id) {
            self.dump_into(out, child, indent + 1);
        }
    }
}
