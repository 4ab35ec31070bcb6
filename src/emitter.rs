/// Accumulates indented source lines.
pub struct CodeEmitter {
    buffer: String,
    depth: usize,
}

const INDENT: &str = "    ";

impl CodeEmitter {
    pub fn new() -> Self {
        CodeEmitter {
            buffer: String::new(),
            depth: 0,
        }
    }

    /// Appends one line at the current indentation.
    pub fn emit(&mut self, line: &str) {
        for _ in 0..self.depth {
            self.buffer.push_str(INDENT);
        }
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn outdent(&mut self) {
        debug_assert!(self.depth > 0, "outdent without matching indent");
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

impl Default for CodeEmitter {
    fn default() -> Self {
        Self::new()
    }
}
