//! Render command stream shared with the host.
//! Must stay in sync with the host's replay loop.
//!
//! Layout (all values f32):
//! ```text
//! [Header: 4 floats]  protocol_version, frame_counter, command_count, payload_floats
//! [Payload]           opcode-prefixed records, back to back
//! ```
//!
//! Records:
//! ```text
//! CLEAR          r, g, b, a
//! ACTIVATE       program
//! UNIFORM_INT    name, value
//! UNIFORM_FLOAT  name, value
//! UNIFORM_VEC3   name, x, y, z
//! UNIFORM_VEC4   name, x, y, z, w
//! UNIFORM_MAT4   name, 16 floats column-major
//! DRAW           mesh, program
//! ```
//! `name` indexes the uniform name table, exported separately as JSON.
//! Handles and indices are small integers stored exactly in f32.

use glam::{Mat4, Vec3, Vec4};

use crate::renderer::traits::{MeshHandle, ProgramHandle, RenderBackend, UniformValue};

pub const HEADER_FLOATS: usize = 4;

pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_COMMAND_COUNT: usize = 2;
pub const HEADER_PAYLOAD_FLOATS: usize = 3;

pub const PROTOCOL_VERSION: f32 = 1.0;

pub const OP_CLEAR: u32 = 1;
pub const OP_ACTIVATE: u32 = 2;
pub const OP_UNIFORM_INT: u32 = 3;
pub const OP_UNIFORM_FLOAT: u32 = 4;
pub const OP_UNIFORM_VEC3: u32 = 5;
pub const OP_UNIFORM_VEC4: u32 = 6;
pub const OP_UNIFORM_MAT4: u32 = 7;
pub const OP_DRAW: u32 = 8;

/// Floats per record including the opcode. Wire format, never changes.
pub fn record_floats(op: u32) -> Option<usize> {
    match op {
        OP_CLEAR => Some(5),
        OP_ACTIVATE => Some(2),
        OP_UNIFORM_INT | OP_UNIFORM_FLOAT => Some(3),
        OP_UNIFORM_VEC3 => Some(5),
        OP_UNIFORM_VEC4 => Some(6),
        OP_UNIFORM_MAT4 => Some(18),
        OP_DRAW => Some(3),
        _ => None,
    }
}

/// A decoded record. Uniform names are resolved through the name table.
#[derive(Debug, Clone, PartialEq)]
pub enum Command<'a> {
    Clear([f32; 4]),
    Activate(ProgramHandle),
    Uniform(&'a str, UniformValue),
    Draw(MeshHandle, ProgramHandle),
}

/// `RenderBackend` that records one frame of calls into a flat f32 buffer.
pub struct CommandBuffer {
    data: Vec<f32>,
    names: Vec<String>,
    frame_counter: u32,
    command_count: u32,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(payload_floats: usize) -> Self {
        let mut data = Vec::with_capacity(HEADER_FLOATS + payload_floats);
        data.resize(HEADER_FLOATS, 0.0);
        data[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        Self {
            data,
            names: Vec::new(),
            frame_counter: 0,
            command_count: 0,
        }
    }

    /// Discard recorded commands and start the next frame.
    /// The name table is kept so indices stay stable across frames.
    pub fn begin_frame(&mut self) {
        self.data.truncate(HEADER_FLOATS);
        self.command_count = 0;
        self.frame_counter = self.frame_counter.wrapping_add(1);
        self.write_header();
    }

    fn write_header(&mut self) {
        self.data[HEADER_FRAME_COUNTER] = self.frame_counter as f32;
        self.data[HEADER_COMMAND_COUNT] = self.command_count as f32;
        self.data[HEADER_PAYLOAD_FLOATS] = (self.data.len() - HEADER_FLOATS) as f32;
    }

    fn name_index(&mut self, name: &str) -> u32 {
        match self.names.iter().position(|n| n == name) {
            Some(idx) => idx as u32,
            None => {
                self.names.push(name.to_string());
                (self.names.len() - 1) as u32
            }
        }
    }

    fn push_record(&mut self, op: u32, fields: &[f32]) {
        self.data.push(op as f32);
        self.data.extend_from_slice(fields);
        self.command_count += 1;
        self.write_header();
    }

    /// Whole buffer including the header.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.command_count == 0
    }

    pub fn command_count(&self) -> u32 {
        self.command_count
    }

    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The uniform name table as a JSON array.
    pub fn names_json(&self) -> String {
        serde_json::to_string(&self.names).unwrap_or_else(|_| "[]".to_string())
    }

    /// Decode the recorded payload. Stops at the first malformed record.
    pub fn commands(&self) -> Vec<Command<'_>> {
        let payload = &self.data[HEADER_FLOATS..];
        let mut out = Vec::with_capacity(self.command_count as usize);
        let mut i = 0;
        while i < payload.len() {
            let op = payload[i] as u32;
            let Some(len) = record_floats(op) else { break };
            let Some(rec) = payload.get(i + 1..i + len) else { break };
            let command = match op {
                OP_CLEAR => Command::Clear([rec[0], rec[1], rec[2], rec[3]]),
                OP_ACTIVATE => Command::Activate(ProgramHandle(rec[0] as u32)),
                OP_DRAW => Command::Draw(MeshHandle(rec[0] as u32), ProgramHandle(rec[1] as u32)),
                _ => {
                    let Some(name) = self.names.get(rec[0] as usize) else { break };
                    let v = &rec[1..];
                    let value = match op {
                        OP_UNIFORM_INT => UniformValue::Int(v[0] as i32),
                        OP_UNIFORM_FLOAT => UniformValue::Float(v[0]),
                        OP_UNIFORM_VEC3 => UniformValue::Vec3(Vec3::from_slice(v)),
                        OP_UNIFORM_VEC4 => UniformValue::Vec4(Vec4::from_slice(v)),
                        _ => UniformValue::Mat4(Mat4::from_cols_slice(v)),
                    };
                    Command::Uniform(name.as_str(), value)
                }
            };
            out.push(command);
            i += len;
        }
        out
    }
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for CommandBuffer {
    fn clear(&mut self, color: [f32; 4]) {
        self.push_record(OP_CLEAR, &color);
    }

    fn activate(&mut self, program: ProgramHandle) {
        self.push_record(OP_ACTIVATE, &[program.0 as f32]);
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        let idx = self.name_index(name) as f32;
        match value {
            UniformValue::Int(v) => self.push_record(OP_UNIFORM_INT, &[idx, v as f32]),
            UniformValue::Float(v) => self.push_record(OP_UNIFORM_FLOAT, &[idx, v]),
            UniformValue::Vec3(v) => self.push_record(OP_UNIFORM_VEC3, &[idx, v.x, v.y, v.z]),
            UniformValue::Vec4(v) => {
                self.push_record(OP_UNIFORM_VEC4, &[idx, v.x, v.y, v.z, v.w])
            }
            UniformValue::Mat4(m) => {
                let mut fields = [0.0; 17];
                fields[0] = idx;
                m.write_cols_to_slice(&mut fields[1..]);
                self.push_record(OP_UNIFORM_MAT4, &fields);
            }
        }
    }

    fn draw(&mut self, mesh: MeshHandle, program: ProgramHandle) {
        self.push_record(OP_DRAW, &[mesh.0 as f32, program.0 as f32]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_tracks_frame_and_counts() {
        let mut buf = CommandBuffer::new();
        buf.begin_frame();
        buf.clear([0.0, 0.0, 0.0, 1.0]);
        buf.draw(MeshHandle(2), ProgramHandle(1));
        let data = buf.as_slice();
        assert_eq!(data[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(data[HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(data[HEADER_COMMAND_COUNT], 2.0);
        assert_eq!(data[HEADER_PAYLOAD_FLOATS], 8.0);
        assert_eq!(buf.len(), HEADER_FLOATS + 8);
    }

    #[test]
    fn begin_frame_clears_payload_keeps_names() {
        let mut buf = CommandBuffer::new();
        buf.begin_frame();
        buf.set_uniform("model", UniformValue::Float(1.0));
        buf.begin_frame();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), HEADER_FLOATS);
        assert_eq!(buf.frame_counter(), 2);
        assert_eq!(buf.names(), &["model".to_string()]);
    }

    #[test]
    fn names_are_interned() {
        let mut buf = CommandBuffer::new();
        buf.set_uniform("view", UniformValue::Int(0));
        buf.set_uniform("model", UniformValue::Int(0));
        buf.set_uniform("view", UniformValue::Int(0));
        assert_eq!(buf.names().len(), 2);
        assert_eq!(buf.names_json(), r#"["view","model"]"#);
        // Second "view" record points at index 0.
        assert_eq!(buf.as_slice()[HEADER_FLOATS + 7], 0.0);
    }

    #[test]
    fn matrix_record_is_column_major() {
        let mut buf = CommandBuffer::new();
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        buf.set_uniform("model", m.into());
        let rec = &buf.as_slice()[HEADER_FLOATS..];
        assert_eq!(rec[0], OP_UNIFORM_MAT4 as f32);
        assert_eq!(rec.len(), record_floats(OP_UNIFORM_MAT4).unwrap());
        // Translation lives in the fourth column.
        assert_eq!(&rec[14..17], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn commands_decode_recorded_frame() {
        let mut buf = CommandBuffer::new();
        buf.begin_frame();
        buf.clear([0.1, 0.2, 0.3, 1.0]);
        buf.activate(ProgramHandle(1));
        buf.set_uniform("lightPos", Vec3::new(0.0, 0.0, -60.0).into());
        buf.set_uniform("texture0", 0.into());
        buf.draw(MeshHandle(1), ProgramHandle(1));
        assert_eq!(
            buf.commands(),
            vec![
                Command::Clear([0.1, 0.2, 0.3, 1.0]),
                Command::Activate(ProgramHandle(1)),
                Command::Uniform("lightPos", UniformValue::Vec3(Vec3::new(0.0, 0.0, -60.0))),
                Command::Uniform("texture0", UniformValue::Int(0)),
                Command::Draw(MeshHandle(1), ProgramHandle(1)),
            ]
        );
    }

    #[test]
    fn unknown_opcode_has_no_size() {
        assert_eq!(record_floats(0), None);
        assert_eq!(record_floats(99), None);
    }
}
