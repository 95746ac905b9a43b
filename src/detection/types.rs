// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 检测数据结构定义
//! Data structures produced by the external detector / tracker

use serde::{Deserialize, Serialize};

/// 跟踪ID (由外部跟踪器分配,同一物体跨帧保持不变)
pub type TrackId = u32;

// ========== 数据结构 ==========

/// 跟踪点 (用于越线判定与绘制轨迹)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub x: f32,
    pub y: f32,
}

impl TrackPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 单个检测框 (中心点 + 尺寸格式, 与跟踪器 xywh 输出一致)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// 跟踪ID, 跟踪器尚未分配时为 None
    #[serde(rename = "id", default)]
    pub track_id: Option<TrackId>,

    /// 中心点坐标
    pub cx: f32,
    pub cy: f32,

    /// 宽高 (可选, 越线判定只用中心点)
    #[serde(default)]
    pub w: f32,
    #[serde(default)]
    pub h: f32,

    /// 检测置信度 [0, 1]
    #[serde(rename = "conf")]
    pub confidence: f32,

    /// 类别ID (COCO: 0 = person)
    #[serde(default)]
    pub class_id: Option<u32>,
}

impl Detection {
    /// 获取锚点 (中心点取整到像素)
    pub fn anchor(&self) -> TrackPoint {
        TrackPoint {
            x: self.cx.trunc(),
            y: self.cy.trunc(),
        }
    }

    /// 转换为左上右下坐标 (x1, y1, x2, y2)
    pub fn xyxy(&self) -> (f32, f32, f32, f32) {
        (
            self.cx - self.w / 2.0,
            self.cy - self.h / 2.0,
            self.cx + self.w / 2.0,
            self.cy + self.h / 2.0,
        )
    }
}

/// 单帧检测结果 (跟踪器 → 计数会话)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameDetections {
    /// 帧序号
    #[serde(rename = "frame")]
    pub index: u64,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_frame() {
        let json = r#"{"frame": 7, "width": 1280, "height": 720,
            "detections": [
                {"id": 3, "cx": 100.8, "cy": 359.6, "w": 40, "h": 120, "conf": 0.91, "class_id": 0},
                {"id": null, "cx": 10.0, "cy": 20.0, "conf": 0.4}
            ]}"#;
        let frame: FrameDetections = serde_json::from_str(json).unwrap();

        assert_eq!(frame.index, 7);
        assert_eq!(frame.height, 720);
        assert_eq!(frame.detections.len(), 2);
        assert_eq!(frame.detections[0].track_id, Some(3));
        assert_eq!(frame.detections[0].class_id, Some(0));
        assert_eq!(frame.detections[1].track_id, None);
        assert_eq!(frame.detections[1].w, 0.0);
    }

    #[test]
    fn test_missing_detections_is_empty_frame() {
        let frame: FrameDetections =
            serde_json::from_str(r#"{"frame": 0, "width": 640, "height": 480}"#).unwrap();
        assert!(frame.detections.is_empty());
    }

    #[test]
    fn test_anchor_truncates_to_pixel() {
        let det = Detection {
            track_id: Some(1),
            cx: 100.8,
            cy: 359.6,
            w: 40.0,
            h: 120.0,
            confidence: 0.9,
            class_id: None,
        };
        assert_eq!(det.anchor(), TrackPoint::new(100.0, 359.0));
    }

    #[test]
    fn test_xyxy() {
        let det = Detection {
            track_id: None,
            cx: 100.0,
            cy: 360.0,
            w: 40.0,
            h: 120.0,
            confidence: 0.5,
            class_id: Some(0),
        };
        assert_eq!(det.xyxy(), (80.0, 300.0, 120.0, 420.0));
    }
}
