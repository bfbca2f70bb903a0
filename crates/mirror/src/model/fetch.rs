//! On-demand requests for data the mirror has not seen yet
//!
//! Each request leaves a pending marker behind so repeated queries do not
//! send duplicates. Markers are only cleared by the matching reply, an
//! invalidation, or a reset. Lost replies are not retried.

use std::collections::HashMap;

use crate::protocol::{Message, Orientation, Role, Value};
use crate::transport::Transport;

use super::node::{Count, NodeId};
use super::RemoteModel;

impl<T: Transport> RemoteModel<T> {
    pub(super) fn request_row_column_count(&mut self, id: NodeId) {
        let Some(path) = self.nodes.path_of(id, 0) else {
            return;
        };
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        // already requesting, or counts arrived
        if node.rows != Count::Unknown || node.columns != Count::Unknown {
            return;
        }
        node.rows = Count::Pending;

        tracing::debug!(%path, "requesting row/column count");
        self.send(Message::RowColumnCountRequest { path });
    }

    pub(super) fn request_data_and_flags(&mut self, id: NodeId, column: usize) {
        let Some(path) = self.nodes.path_of(id, column) else {
            return;
        };
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.data.contains_key(&column) {
            return;
        }
        debug_assert!(!node.flags.contains_key(&column));
        // an empty entry marks the request as pending
        node.data.insert(column, HashMap::new());

        tracing::debug!(%path, "requesting content");
        self.send(Message::ContentRequest { path });
    }

    pub(super) fn request_header_data(&mut self, orientation: Orientation, section: usize) {
        if self.headers.contains(orientation, section) {
            return;
        }
        let placeholder = HashMap::from([(
            Role::DISPLAY,
            Value::from(self.config.loading_text.as_str()),
        )]);
        self.headers.insert(orientation, section, placeholder);

        tracing::debug!(?orientation, section, "requesting header data");
        self.send(Message::HeaderRequest {
            orientation,
            section,
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::model::testing::{connected_model, deliver};
    use crate::protocol::{Message, ModelPath, Orientation, Role, Value};

    #[test]
    fn test_row_count_requests_once() {
        let (mut model, transport) = connected_model();

        assert_eq!(model.row_count(None), 0);
        assert_eq!(model.row_count(None), 0);
        assert_eq!(model.column_count(None), 0);

        assert_eq!(
            transport.sent(),
            vec![Message::RowColumnCountRequest {
                path: ModelPath::root()
            }]
        );
    }

    #[test]
    fn test_content_requested_once_with_loading_placeholder() {
        let (mut model, transport) = connected_model();
        model.row_count(None);
        deliver(
            &mut model,
            Message::RowColumnCountReply {
                path: ModelPath::root(),
                rows: 2,
                columns: 3,
            },
        );
        transport.clear();
        let index = model.index(1, 2, None).unwrap();

        assert_eq!(
            model.data(&index, Role::DISPLAY),
            Some(Value::from("Loading..."))
        );
        assert_eq!(model.data(&index, Role::TOOL_TIP), None);
        assert_eq!(
            model.data(&index, Role::DISPLAY),
            Some(Value::from("Loading..."))
        );

        assert_eq!(
            transport.sent(),
            vec![Message::ContentRequest {
                path: ModelPath::from_pairs(&[(1, 2)])
            }]
        );
    }

    #[test]
    fn test_header_requested_once() {
        let (mut model, transport) = connected_model();

        assert_eq!(
            model.header_data(4, Orientation::Horizontal, Role::DISPLAY),
            Some(Value::from("Loading..."))
        );
        assert_eq!(
            model.header_data(4, Orientation::Horizontal, Role::TOOL_TIP),
            None
        );
        // the other orientation is independent
        model.header_data(4, Orientation::Vertical, Role::DISPLAY);

        assert_eq!(
            transport.sent(),
            vec![
                Message::HeaderRequest {
                    orientation: Orientation::Horizontal,
                    section: 4
                },
                Message::HeaderRequest {
                    orientation: Orientation::Vertical,
                    section: 4
                },
            ]
        );
    }

    #[test]
    fn test_child_count_request_uses_child_path() {
        let (mut model, transport) = connected_model();
        model.row_count(None);
        deliver(
            &mut model,
            Message::RowColumnCountReply {
                path: ModelPath::root(),
                rows: 3,
                columns: 2,
            },
        );
        transport.clear();
        let index = model.index(2, 0, None).unwrap();

        assert_eq!(model.row_count(Some(&index)), 0);
        // only column 0 has children
        let side = model.index(2, 1, None).unwrap();
        assert_eq!(model.row_count(Some(&side)), 0);

        assert_eq!(
            transport.sent(),
            vec![Message::RowColumnCountRequest {
                path: ModelPath::from_pairs(&[(2, 0)])
            }]
        );
    }
}
