// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The multi-frame loop.  For frame `i` of `n`, `percent` is `i / n`;
//! the caller's configure function turns that into a Frame, which is
//! rendered into a fresh Canvas and handed to the caller's sink.

use crate::errors::{invalid, BlfractError, Result};
use crate::presets::Frame;
use crate::surface::Canvas;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Render `frames` frames of `width` x `height` on `threads` threads.
pub fn render_frames<C, K>(
    width: usize,
    height: usize,
    frames: usize,
    threads: usize,
    mut configure: C,
    mut sink: K,
) -> Result<()>
where
    C: FnMut(f64) -> Result<Frame>,
    K: FnMut(usize, &Canvas) -> Result<()>,
{
    if frames == 0 {
        return Err(invalid("frames", "at least one frame is required"));
    }
    for index in 0..frames {
        let percent = index as f64 / frames as f64;
        let frame = configure(percent)?;
        debug!("frame {} of {} at {:.4}", index + 1, frames, percent);
        let canvas = frame
            .pipeline
            .render(width, height, frame.budget, threads)?;
        sink(index, &canvas)?;
    }
    Ok(())
}

/// Where frame `index` of a sequence lives inside `dir`.
pub fn frame_path<P: AsRef<Path>>(dir: P, index: usize) -> PathBuf {
    dir.as_ref().join(format!("frame_{:04}.png", index))
}

/// Render a sequence of frames into `dir` as numbered PNGs, creating the
/// directory if needed.  Returns the paths written.
pub fn save_sequence<P, C>(
    dir: P,
    width: usize,
    height: usize,
    frames: usize,
    threads: usize,
    configure: C,
) -> Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
    C: FnMut(f64) -> Result<Frame>,
{
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| BlfractError::Output {
        path: dir.display().to_string(),
        reason: e.to_string(),
    })?;
    let mut written = vec![];
    render_frames(width, height, frames, threads, configure, |index, canvas| {
        let path = frame_path(dir, index);
        canvas.save(&path)?;
        info!("wrote {}", path.display());
        written.push(path);
        Ok(())
    })?;
    Ok(written)
}
