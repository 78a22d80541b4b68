use std::path::{Path, PathBuf};

use crate::{
    foundation::{
        core::{Fps, FrameSize, is_positive_duration},
        error::{StitchError, StitchResult},
    },
    model::source::Source,
    process::processor::{HandleKind, MediaHandle, MediaProcessor, ensure_parent_dir},
};

/// [`MediaProcessor`] that shells out to the system `ffmpeg` binary.
///
/// Intermediates are written to `work_dir` with a monotonically numbered prefix; the concatenated
/// result goes to `out_path` (default `work_dir/timeline.mp4`). Outputs carry no audio track.
#[derive(Debug)]
pub struct FfmpegProcessor {
    work_dir: PathBuf,
    out_path: PathBuf,
    next_id: u32,
}

impl FfmpegProcessor {
    pub fn new(work_dir: impl Into<PathBuf>) -> StitchResult<Self> {
        let work_dir = work_dir.into();
        std::fs::create_dir_all(&work_dir).map_err(|e| {
            StitchError::media(format!(
                "failed to create work directory '{}': {e}",
                work_dir.display()
            ))
        })?;
        Ok(Self {
            out_path: work_dir.join("timeline.mp4"),
            work_dir,
            next_id: 0,
        })
    }

    pub fn with_out_path(mut self, out_path: impl Into<PathBuf>) -> Self {
        self.out_path = out_path.into();
        self
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn next_path(&mut self, stem: &str, ext: &str) -> PathBuf {
        let id = self.next_id;
        self.next_id += 1;
        self.work_dir.join(format!("{id:04}_{stem}.{ext}"))
    }
}

impl MediaProcessor for FfmpegProcessor {
    fn normalize(
        &mut self,
        source: &Source,
        frame: FrameSize,
        fps: Fps,
    ) -> StitchResult<MediaHandle> {
        frame.validate()?;
        let (out, kind, args) = if source.kind.is_time_based() {
            let out = self.next_path("clip", "mp4");
            let args = normalize_clip_args(&source.location, frame, fps, &out);
            (out, HandleKind::Video, args)
        } else {
            let out = self.next_path("image", "png");
            let args = scale_image_args(&source.location, frame, &out);
            (out, HandleKind::Image, args)
        };
        run_ffmpeg(&args)?;
        Ok(MediaHandle {
            path: out,
            kind,
            frame,
            fps,
        })
    }

    fn trim(&mut self, handle: &MediaHandle, duration: f64) -> StitchResult<MediaHandle> {
        if handle.kind != HandleKind::Video {
            return Err(StitchError::media("trim expects a video handle"));
        }
        if !is_positive_duration(duration) {
            return Err(StitchError::media(format!(
                "trim duration must be > 0, got {duration}"
            )));
        }
        let out = self.next_path("trim", "mp4");
        run_ffmpeg(&trim_args(&handle.path, duration, &out))?;
        Ok(MediaHandle {
            path: out,
            ..handle.clone()
        })
    }

    fn render_scroll(
        &mut self,
        image: &MediaHandle,
        duration: f64,
        scroll_distance: u32,
    ) -> StitchResult<MediaHandle> {
        if image.kind != HandleKind::Image {
            return Err(StitchError::media("render_scroll expects an image handle"));
        }
        if !is_positive_duration(duration) {
            return Err(StitchError::media(format!(
                "scroll duration must be > 0, got {duration}"
            )));
        }
        let out = self.next_path(if scroll_distance == 0 { "still" } else { "scroll" }, "mp4");
        run_ffmpeg(&scroll_args(
            &image.path,
            image.frame,
            image.fps,
            duration,
            scroll_distance,
            &out,
        ))?;
        Ok(MediaHandle {
            path: out,
            kind: HandleKind::Video,
            frame: image.frame,
            fps: image.fps,
        })
    }

    fn concatenate(&mut self, handles: &[MediaHandle]) -> StitchResult<MediaHandle> {
        let Some(first) = handles.first() else {
            return Err(StitchError::media("nothing to concatenate"));
        };
        if let Some(bad) = handles.iter().find(|h| h.kind != HandleKind::Video) {
            return Err(StitchError::media(format!(
                "cannot concatenate non-video handle '{}'",
                bad.path.display()
            )));
        }

        let list_path = self.next_path("concat", "txt");
        std::fs::write(&list_path, concat_list(handles)).map_err(|e| {
            StitchError::media(format!(
                "failed to write concat list '{}': {e}",
                list_path.display()
            ))
        })?;
        ensure_parent_dir(&self.out_path)?;
        run_ffmpeg(&concat_args(&list_path, &self.out_path))?;
        Ok(MediaHandle {
            path: self.out_path.clone(),
            kind: HandleKind::Video,
            frame: first.frame,
            fps: first.fps,
        })
    }
}

fn pad_filter(frame: FrameSize) -> String {
    let FrameSize { width: w, height: h } = frame;
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1"
    )
}

const H264_OUT: [&str; 6] = ["-c:v", "libx264", "-pix_fmt", "yuv420p", "-an", "-y"];

fn path_arg(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}

pub(crate) fn normalize_clip_args(
    location: &str,
    frame: FrameSize,
    fps: Fps,
    out: &Path,
) -> Vec<String> {
    let vf = format!("{},fps={}", pad_filter(frame), fps.to_ff_ratio());
    let mut args: Vec<String> = ["-v", "error", "-i", location, "-vf", vf.as_str()]
        .into_iter()
        .map(String::from)
        .collect();
    args.extend(H264_OUT.iter().map(|s| s.to_string()));
    args.push(path_arg(out));
    args
}

pub(crate) fn scale_image_args(location: &str, frame: FrameSize, out: &Path) -> Vec<String> {
    // `-2` keeps the height even for yuv420p.
    let vf = format!("scale={}:-2,setsar=1", frame.width);
    vec![
        "-v".into(),
        "error".into(),
        "-i".into(),
        location.into(),
        "-vf".into(),
        vf,
        "-frames:v".into(),
        "1".into(),
        "-y".into(),
        path_arg(out),
    ]
}

pub(crate) fn trim_args(input: &Path, duration: f64, out: &Path) -> Vec<String> {
    let mut args = vec![
        "-v".to_string(),
        "error".into(),
        "-i".into(),
        path_arg(input),
        "-t".into(),
        format!("{duration:.6}"),
    ];
    args.extend(H264_OUT.iter().map(|s| s.to_string()));
    args.push(path_arg(out));
    args
}

/// Loop a scaled image for `duration` seconds. A non-zero distance moves a frame-sized crop window
/// down at constant speed, stopping at the bottom edge.
pub(crate) fn scroll_args(
    image: &Path,
    frame: FrameSize,
    fps: Fps,
    duration: f64,
    distance: u32,
    out: &Path,
) -> Vec<String> {
    let vf = if distance == 0 {
        pad_filter(frame)
    } else {
        let speed = f64::from(distance) / duration;
        format!(
            "crop={}:{}:0:'min(t*{speed:.6},ih-oh)',setsar=1",
            frame.width, frame.height
        )
    };
    let mut args = vec![
        "-v".to_string(),
        "error".into(),
        "-loop".into(),
        "1".into(),
        "-framerate".into(),
        fps.to_ff_ratio(),
        "-i".into(),
        path_arg(image),
        "-vf".into(),
        vf,
        "-t".into(),
        format!("{duration:.6}"),
        "-r".into(),
        fps.to_ff_ratio(),
    ];
    args.extend(H264_OUT.iter().map(|s| s.to_string()));
    args.push(path_arg(out));
    args
}

/// Concat-demuxer list file body. Single quotes in paths are escaped the way the demuxer expects.
pub(crate) fn concat_list(handles: &[MediaHandle]) -> String {
    handles
        .iter()
        .map(|h| {
            let abs = std::path::absolute(&h.path).unwrap_or_else(|_| h.path.clone());
            format!("file '{}'\n", path_arg(&abs).replace('\'', "'\\''"))
        })
        .collect()
}

pub(crate) fn concat_args(list: &Path, out: &Path) -> Vec<String> {
    vec![
        "-v".into(),
        "error".into(),
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        path_arg(list),
        "-c".into(),
        "copy".into(),
        "-y".into(),
        path_arg(out),
    ]
}

#[cfg(feature = "media-ffmpeg")]
fn run_ffmpeg(args: &[String]) -> StitchResult<()> {
    tracing::debug!(args = ?args, "running ffmpeg");
    let output = std::process::Command::new("ffmpeg")
        .args(args)
        .stdin(std::process::Stdio::null())
        .output()
        .map_err(|e| StitchError::media(format!("failed to spawn ffmpeg: {e}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(StitchError::media(format!(
            "ffmpeg exited with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}

#[cfg(not(feature = "media-ffmpeg"))]
fn run_ffmpeg(_args: &[String]) -> StitchResult<()> {
    Err(StitchError::media(
        "media processing requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/process/ffmpeg.rs"]
mod tests;
