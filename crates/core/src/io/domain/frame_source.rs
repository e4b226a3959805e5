use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;

/// Port for whatever supplies frames to a session.
///
/// Video container demux and codec work live entirely behind this boundary;
/// the pipeline only ever sees decoded RGB frames in sequence order.
pub trait FrameSource: Send {
    fn open(&mut self, path: &Path) -> Result<StreamInfo, Box<dyn std::error::Error>>;

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    fn close(&mut self);
}
