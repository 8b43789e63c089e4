use crate::arena::OmArena;
use crate::node::{NodeId, NodeKind};

const MISSING: &str = "'?'";

impl OmArena {
    /// Render a tree in the compact syntax.
    ///
    /// The rendering is lossy: attributes and symbol uris are dropped, byte arrays print
    /// as `'byte array'` and errors as `'error'`. Trees built from compact text print
    /// back to equivalent text.
    ///
    /// Strings only escape `'`. A string ending in a backslash prints as `'a\'`, which
    /// [`OmArena::simple_decode`] cannot read back.
    pub fn simple_encode(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_simple(id, &mut out);
        out
    }

    fn write_simple(&self, id: NodeId, out: &mut String) {
        let Some(kind) = self.kind(id) else {
            out.push_str(MISSING);
            return;
        };
        let slot = |slot: Option<NodeId>, out: &mut String| match slot {
            Some(id) => self.write_simple(id, out),
            None => out.push_str(MISSING),
        };

        match kind {
            NodeKind::Integer(value) => out.push_str(&value.to_string()),
            NodeKind::Float(value) => out.push_str(&value.to_string()),
            NodeKind::String(value) => {
                out.push('\'');
                out.push_str(&value.replace('\'', "\\'"));
                out.push('\'');
            }
            NodeKind::ByteArray(_) => out.push_str("'byte array'"),
            NodeKind::Symbol(symbol) => out.push_str(&symbol.to_string()),
            NodeKind::Variable(name) => out.push_str(name),
            NodeKind::Application(children) => {
                let Some((&head, operands)) = children.split_first() else {
                    out.push_str(MISSING);
                    return;
                };
                self.write_simple(head, out);
                out.push('(');
                for (i, &operand) in operands.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_simple(operand, out);
                }
                out.push(')');
            }
            NodeKind::Binding {
                symbol,
                variables,
                body,
            } => {
                slot(*symbol, out);
                out.push('[');
                for &variable in variables {
                    self.write_simple(variable, out);
                    out.push(',');
                }
                slot(*body, out);
                out.push(']');
            }
            NodeKind::Error { .. } => out.push_str("'error'"),
        }
    }
}
