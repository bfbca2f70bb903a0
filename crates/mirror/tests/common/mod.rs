//! Shared helpers for mirror integration tests
//!
//! `FakeRemote` plays the remote side of the channel: it reads the frames a
//! `Client` queues, answers requests from an in-memory tree and pushes
//! change notifications back through the same client.

#![allow(dead_code)]

use anyhow::{anyhow, Result};

use mirror::protocol::{self, DEFAULT_MAX_MESSAGE_SIZE};
use mirror::{
    Client, Envelope, ItemData, ItemFlags, Message, MirrorConfig, ModelEvent, ModelPath,
    ObjectAddress, Orientation, RemoteModel, Role, Value,
};

pub const OBJECT: &str = "com.example.ObjectTree";
pub const ADDRESS: ObjectAddress = ObjectAddress(3);
pub const COLUMNS: usize = 2;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// One row of the remote tree
#[derive(Debug, Clone)]
pub struct FakeItem {
    pub cells: [String; COLUMNS],
    pub children: Vec<FakeItem>,
}

impl FakeItem {
    pub fn new(name: &str) -> Self {
        Self {
            cells: [name.to_string(), format!("{name} type")],
            children: Vec::new(),
        }
    }

    pub fn child(mut self, child: FakeItem) -> Self {
        self.children.push(child);
        self
    }
}

/// In-memory remote model answering over a real `Client`
pub struct FakeRemote {
    pub client: Client,
    outbound: flume::Receiver<Vec<u8>>,
    pub root: FakeItem,
    /// Every request received, in order
    pub received: Vec<Message>,
}

impl FakeRemote {
    /// A remote object already registered on a fresh client
    pub fn new(root: FakeItem) -> Self {
        let (client, outbound) = Client::with_config(&MirrorConfig::for_object(OBJECT));
        client.object_registered(OBJECT, ADDRESS);
        Self {
            client,
            outbound,
            root,
            received: Vec::new(),
        }
    }

    pub fn model(&self) -> RemoteModel<Client> {
        RemoteModel::new(self.client.clone(), MirrorConfig::for_object(OBJECT))
    }

    /// Answer one queued request; returns false if nothing was queued
    pub fn pump_one(&mut self) -> Result<bool> {
        let Ok(bytes) = self.outbound.try_recv() else {
            return Ok(false);
        };
        let envelope = protocol::decode(&bytes, DEFAULT_MAX_MESSAGE_SIZE)?;
        if envelope.address != ADDRESS {
            return Err(anyhow!("request for unexpected address {}", envelope.address));
        }
        self.received.push(envelope.message.clone());
        if let Some(reply) = self.answer(envelope.message)? {
            self.push(reply)?;
        }
        Ok(true)
    }

    /// Answer every queued request
    pub fn pump(&mut self) -> Result<usize> {
        let mut answered = 0;
        while self.pump_one()? {
            answered += 1;
        }
        Ok(answered)
    }

    /// Send a message to the mirror side
    pub fn push(&self, message: Message) -> Result<()> {
        let bytes = protocol::encode(&Envelope::new(ADDRESS, message))?;
        self.client.receive(&bytes)?;
        Ok(())
    }

    /// Remove rows `first..=last` below `parent` and announce it
    pub fn remove_rows(&mut self, parent: &ModelPath, first: usize, last: usize) -> Result<()> {
        let item = self.item_mut(parent)?;
        item.children.drain(first..=last);
        self.push(Message::RowsRemoved {
            parent: parent.clone(),
            first,
            last,
        })
    }

    /// Insert `items` at `first` below `parent` and announce it
    pub fn insert_rows(
        &mut self,
        parent: &ModelPath,
        first: usize,
        items: Vec<FakeItem>,
    ) -> Result<()> {
        let count = items.len();
        let item = self.item_mut(parent)?;
        item.children.splice(first..first, items);
        self.push(Message::RowsAdded {
            parent: parent.clone(),
            first,
            last: first + count - 1,
        })
    }

    fn answer(&mut self, message: Message) -> Result<Option<Message>> {
        let reply = match message {
            Message::SyncBarrier(value) => Message::SyncBarrier(value),
            Message::RowColumnCountRequest { path } => {
                let rows = self.item(&path)?.children.len();
                Message::RowColumnCountReply {
                    path,
                    rows,
                    columns: COLUMNS,
                }
            }
            Message::ContentRequest { path } => {
                let column = path.last().map(|s| s.column).unwrap_or(0);
                let text = self.item(&path)?.cells[column].clone();
                Message::ContentReply {
                    path,
                    data: ItemData::from([(Role::DISPLAY, Value::from(text))]),
                    flags: ItemFlags::SELECTABLE | ItemFlags::ENABLED,
                }
            }
            Message::HeaderRequest {
                orientation,
                section,
            } => {
                let label = match orientation {
                    Orientation::Horizontal => ["Object", "Type"]
                        .get(section)
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                    Orientation::Vertical => (section + 1).to_string(),
                };
                Message::HeaderReply {
                    orientation,
                    section,
                    data: ItemData::from([(Role::DISPLAY, Value::from(label))]),
                }
            }
            Message::SetDataRequest { path, value, .. } => {
                let column = path.last().map(|s| s.column).unwrap_or(0);
                let text = value
                    .as_str()
                    .ok_or_else(|| anyhow!("only text cells are editable"))?
                    .to_string();
                self.item_mut(&path)?.cells[column] = text;
                Message::ContentChanged {
                    begin: path.clone(),
                    end: path,
                }
            }
            other => return Err(anyhow!("unexpected {} from mirror", other.name())),
        };
        Ok(Some(reply))
    }

    fn item(&self, path: &ModelPath) -> Result<&FakeItem> {
        let mut item = &self.root;
        for segment in path.segments() {
            item = item
                .children
                .get(segment.row)
                .ok_or_else(|| anyhow!("no item at {}", path))?;
        }
        Ok(item)
    }

    fn item_mut(&mut self, path: &ModelPath) -> Result<&mut FakeItem> {
        let mut item = &mut self.root;
        for segment in path.segments() {
            item = item
                .children
                .get_mut(segment.row)
                .ok_or_else(|| anyhow!("no item at {}", path))?;
        }
        Ok(item)
    }
}

/// Let requests and replies flow until both sides are quiet
pub fn settle(remote: &mut FakeRemote, model: &mut RemoteModel<Client>) -> Result<()> {
    loop {
        let answered = remote.pump()?;
        let applied = model.process_pending();
        if answered == 0 && applied == 0 {
            return Ok(());
        }
    }
}

pub fn drain(events: &flume::Receiver<ModelEvent>) -> Vec<ModelEvent> {
    events.try_iter().collect()
}

/// Sample tree:
///
/// ```text
/// root
///  ├── app
///  │    ├── window
///  │    └── timer
///  ├── thread
///  └── settings
/// ```
pub fn sample_tree() -> FakeItem {
    FakeItem::new("root")
        .child(
            FakeItem::new("app")
                .child(FakeItem::new("window"))
                .child(FakeItem::new("timer")),
        )
        .child(FakeItem::new("thread"))
        .child(FakeItem::new("settings"))
}
