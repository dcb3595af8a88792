pub mod timeout;

// cpu intensive utilities
pub mod cpu {
    pub mod splitting;
    pub mod sqrt;
    pub mod pi;
}
