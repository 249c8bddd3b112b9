//! Typed access to display matrix, downmix and motion vector side data

use std::mem::size_of;
use std::os::raw::c_int;

use crate::ffi::frame::AVFrameSideDataType;
use crate::ffi::side_data::{AVDownmixInfo, AVDownmixType, AVMotionVector, DisplayMatrix};

use super::frame::Frame;
use super::{lib, UtilError, UtilResult};

// ============================================================================
// Display matrix
// ============================================================================

/// Counterclockwise rotation in degrees; `None` for a degenerate matrix
pub fn rotation(matrix: &DisplayMatrix) -> UtilResult<Option<f64>> {
    let lib = lib()?;
    let angle = unsafe { (lib.display.av_display_rotation_get)(matrix.as_ptr()) };
    Ok((!angle.is_nan()).then_some(angle))
}

/// Matrix for a pure counterclockwise rotation of `angle` degrees
pub fn rotation_matrix(angle: f64) -> UtilResult<DisplayMatrix> {
    let lib = lib()?;
    let mut matrix: DisplayMatrix = [0; 9];
    unsafe { (lib.display.av_display_rotation_set)(matrix.as_mut_ptr(), angle) };
    Ok(matrix)
}

/// Mirror horizontally and/or vertically in place
pub fn flip(matrix: &mut DisplayMatrix, horizontal: bool, vertical: bool) -> UtilResult<()> {
    let lib = lib()?;
    unsafe {
        (lib.display.av_display_matrix_flip)(matrix.as_mut_ptr(), horizontal as c_int, vertical as c_int)
    };
    Ok(())
}

pub fn display_matrix(frame: &Frame) -> Option<DisplayMatrix> {
    let bytes = frame.side_data(AVFrameSideDataType::DisplayMatrix)?;
    if bytes.len() < size_of::<DisplayMatrix>() {
        return None;
    }
    let mut matrix: DisplayMatrix = [0; 9];
    for (value, chunk) in matrix.iter_mut().zip(bytes.chunks_exact(4)) {
        *value = i32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Some(matrix)
}

/// Attach `matrix`, replacing any existing display matrix
pub fn set_display_matrix(frame: &mut Frame, matrix: &DisplayMatrix) -> UtilResult<()> {
    if frame.side_data(AVFrameSideDataType::DisplayMatrix).is_some() {
        frame.remove_side_data(AVFrameSideDataType::DisplayMatrix)?;
    }
    let dst = frame.new_side_data(AVFrameSideDataType::DisplayMatrix, size_of::<DisplayMatrix>())?;
    for (chunk, value) in dst.chunks_exact_mut(4).zip(matrix) {
        chunk.copy_from_slice(&value.to_ne_bytes());
    }
    Ok(())
}

// ============================================================================
// Downmix info
// ============================================================================

/// Downmix info of `frame`, attached zeroed when absent
pub fn downmix_info_mut(frame: &mut Frame) -> UtilResult<&mut AVDownmixInfo> {
    let lib = lib()?;
    unsafe {
        (lib.downmix.av_downmix_info_update_side_data)(frame.as_mut_ptr())
            .as_mut()
            .ok_or(UtilError::AllocationFailed("AVDownmixInfo"))
    }
}

pub fn downmix_info(frame: &Frame) -> Option<AVDownmixInfo> {
    let bytes = frame.side_data(AVFrameSideDataType::DownmixInfo)?;
    if bytes.len() < size_of::<AVDownmixInfo>() {
        return None;
    }
    Some(unsafe { std::ptr::read_unaligned(bytes.as_ptr().cast()) })
}

impl AVDownmixInfo {
    pub fn downmix_type(&self) -> AVDownmixType {
        AVDownmixType::from_raw(self.preferred_downmix_type).unwrap_or(AVDownmixType::Unknown)
    }
}

// ============================================================================
// Motion vectors
// ============================================================================

pub fn motion_vectors(frame: &Frame) -> Vec<AVMotionVector> {
    let Some(bytes) = frame.side_data(AVFrameSideDataType::MotionVectors) else {
        return Vec::new();
    };
    bytes
        .chunks_exact(size_of::<AVMotionVector>())
        .map(|chunk| unsafe { std::ptr::read_unaligned(chunk.as_ptr().cast()) })
        .collect()
}

pub fn set_motion_vectors(frame: &mut Frame, vectors: &[AVMotionVector]) -> UtilResult<()> {
    if frame.side_data(AVFrameSideDataType::MotionVectors).is_some() {
        frame.remove_side_data(AVFrameSideDataType::MotionVectors)?;
    }
    let size = vectors.len() * size_of::<AVMotionVector>();
    let dst = frame.new_side_data(AVFrameSideDataType::MotionVectors, size)?;
    if dst.len() < size {
        return Err(UtilError::AllocationFailed("motion vector side data"));
    }
    unsafe { std::ptr::copy_nonoverlapping(vectors.as_ptr().cast::<u8>(), dst.as_mut_ptr(), size) };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::testing;

    #[test]
    fn test_rotation_and_flip() {
        let Some(_) = testing::native() else {
            return;
        };

        let matrix = rotation_matrix(90.0).unwrap();
        let angle = rotation(&matrix).unwrap().unwrap();
        assert!((angle.abs() - 90.0).abs() < 1e-3, "got {angle}");
        assert_eq!(rotation(&[0; 9]).unwrap(), None);

        let mut identity = rotation_matrix(0.0).unwrap();
        assert_eq!(identity[0], 1 << 16);
        flip(&mut identity, true, false).unwrap();
        assert_eq!(identity[0], -(1 << 16));
        assert_eq!(identity[4], 1 << 16);
    }

    #[test]
    fn test_frame_display_matrix() {
        let Some(_) = testing::native() else {
            return;
        };

        let mut frame = Frame::new().unwrap();
        assert!(display_matrix(&frame).is_none());

        let matrix = rotation_matrix(180.0).unwrap();
        set_display_matrix(&mut frame, &matrix).unwrap();
        assert_eq!(display_matrix(&frame), Some(matrix));

        let Ok(()) = set_display_matrix(&mut frame, &rotation_matrix(0.0).unwrap()) else {
            return;
        };
        assert_eq!(display_matrix(&frame).unwrap()[0], 1 << 16);
    }

    #[test]
    fn test_downmix_info() {
        let Some(_) = testing::native() else {
            return;
        };

        let mut frame = Frame::new().unwrap();
        assert!(downmix_info(&frame).is_none());
        {
            let info = downmix_info_mut(&mut frame).unwrap();
            assert_eq!(info.downmix_type(), AVDownmixType::Unknown);
            info.preferred_downmix_type = AVDownmixType::Ltrt.as_raw();
            info.center_mix_level = 0.5;
        }
        let info = downmix_info(&frame).unwrap();
        assert_eq!(info.downmix_type(), AVDownmixType::Ltrt);
        assert_eq!(info.center_mix_level, 0.5);
        assert_eq!(downmix_info_mut(&mut frame).unwrap().center_mix_level, 0.5);
    }

    #[test]
    fn test_motion_vectors() {
        let Some(_) = testing::native() else {
            return;
        };

        let mut frame = Frame::new().unwrap();
        assert!(motion_vectors(&frame).is_empty());
        let vectors = [
            AVMotionVector {
                source: -1,
                w: 16,
                h: 16,
                src_x: 8,
                src_y: 8,
                dst_x: 10,
                dst_y: 6,
                flags: 0,
            },
            AVMotionVector {
                source: 1,
                w: 8,
                h: 8,
                ..Default::default()
            },
        ];
        set_motion_vectors(&mut frame, &vectors).unwrap();
        assert_eq!(motion_vectors(&frame), vectors);
    }
}
