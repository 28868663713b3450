use super::codec::FrameWriter;
use super::types::{DatabaseType, StorageType};
use super::{DRIVER_NAME, DRIVER_VERSION, SERIALIZER_NAME};
use crate::schema::Rid;
use crate::serializer::encode_params;

/// Request operation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Operation {
    Connect = 2,
    DbOpen = 3,
    DbCreate = 4,
    DbClose = 5,
    DbExist = 6,
    DbDrop = 7,
    RecordLoad = 30,
    Command = 41,
}

/// Whether command text is sent as an idempotent query or as a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Query { limit: i32, fetch_plan: String },
    Command,
}

#[derive(Debug, Clone)]
pub enum Request {
    Connect {
        username: String,
        password: String,
    },
    DbOpen {
        database: String,
        db_type: DatabaseType,
        username: String,
        password: String,
    },
    DbCreate {
        database: String,
        db_type: DatabaseType,
        storage: StorageType,
    },
    DbClose,
    DbExist {
        database: String,
        storage: StorageType,
    },
    DbDrop {
        database: String,
        storage: StorageType,
    },
    RecordLoad {
        rid: Rid,
        fetch_plan: String,
        ignore_cache: bool,
    },
    Command {
        kind: CommandKind,
        text: String,
        params: Vec<String>,
    },
}

impl Request {
    pub fn operation(&self) -> Operation {
        match self {
            Request::Connect { .. } => Operation::Connect,
            Request::DbOpen { .. } => Operation::DbOpen,
            Request::DbCreate { .. } => Operation::DbCreate,
            Request::DbClose => Operation::DbClose,
            Request::DbExist { .. } => Operation::DbExist,
            Request::DbDrop { .. } => Operation::DbDrop,
            Request::RecordLoad { .. } => Operation::RecordLoad,
            Request::Command { .. } => Operation::Command,
        }
    }
}

/// Frame a request for the given session.
pub fn encode_request(request: &Request, session_id: i32, protocol_version: i16) -> Vec<u8> {
    let mut w = FrameWriter::new();
    w.write_byte(request.operation() as u8).write_int(session_id);

    match request {
        Request::Connect { username, password } => {
            write_client_prelude(&mut w, protocol_version);
            w.write_string(username).write_string(password);
        }
        Request::DbOpen {
            database,
            db_type,
            username,
            password,
        } => {
            write_client_prelude(&mut w, protocol_version);
            w.write_string(database)
                .write_string(db_type.as_str())
                .write_string(username)
                .write_string(password);
        }
        Request::DbCreate {
            database,
            db_type,
            storage,
        } => {
            w.write_string(database)
                .write_string(db_type.as_str())
                .write_string(storage.as_str());
        }
        Request::DbClose => {}
        Request::DbExist { database, storage } | Request::DbDrop { database, storage } => {
            w.write_string(database).write_string(storage.as_str());
        }
        Request::RecordLoad {
            rid,
            fetch_plan,
            ignore_cache,
        } => {
            w.write_short(rid.cluster_id)
                .write_long(rid.cluster_pos)
                .write_string(fetch_plan)
                .write_bool(*ignore_cache)
                .write_bool(false); // load tombstones
        }
        Request::Command { kind, text, params } => {
            w.write_byte(b's');
            w.write_bytes(&encode_command_payload(kind, text, params));
        }
    }

    w.into_inner()
}

fn write_client_prelude(w: &mut FrameWriter, protocol_version: i16) {
    w.write_string(DRIVER_NAME)
        .write_string(DRIVER_VERSION)
        .write_short(protocol_version)
        .write_null_string() // client id
        .write_string(SERIALIZER_NAME)
        .write_bool(false); // token based session
}

/// Body of a synchronous command request (the part wrapped in a byte array).
fn encode_command_payload(kind: &CommandKind, text: &str, params: &[String]) -> Vec<u8> {
    let mut w = FrameWriter::new();
    match kind {
        CommandKind::Query { limit, fetch_plan } => {
            w.write_string("q")
                .write_string(text)
                .write_int(*limit)
                .write_string(fetch_plan);
            if params.is_empty() {
                w.write_bytes(&[]);
            } else {
                w.write_bytes(&encode_params(params));
            }
        }
        CommandKind::Command => {
            w.write_string("c").write_string(text);
            if params.is_empty() {
                w.write_bool(false);
            } else {
                w.write_bool(true).write_bytes(&encode_params(params));
            }
            w.write_bool(false); // no complex parameters
        }
    }
    w.into_inner()
}
