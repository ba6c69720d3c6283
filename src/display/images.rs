use image::Rgb;

use crate::device::Frame;

const R: Rgb<u8> = Rgb([155, 0, 0]);
const G: Rgb<u8> = Rgb([0, 155, 0]);
const Y: Rgb<u8> = Rgb([155, 155, 0]);
const P: Rgb<u8> = Rgb([0, 0, 0]);
const H: Rgb<u8> = Rgb([153, 76, 0]);
const S: Rgb<u8> = Rgb([255, 179, 102]);
const E: Rgb<u8> = Rgb([0, 102, 0]);

/// 葡萄牙国旗（启动画面）
#[rustfmt::skip]
pub const FLAG: Frame = [
    G, G, G, R, R, R, R, R,
    G, G, G, R, R, R, R, R,
    G, G, G, R, R, R, R, R,
    G, G, Y, Y, R, R, R, R,
    G, G, Y, Y, R, R, R, R,
    G, G, G, R, R, R, R, R,
    G, G, G, R, R, R, R, R,
    G, G, G, R, R, R, R, R,
];

/// 宇航员头像（检测到运动时显示）
#[rustfmt::skip]
pub const ASTRONAUT: Frame = [
    P, H, H, H, H, H, H, P,
    S, S, S, S, S, S, S, H,
    S, P, P, S, P, P, S, H,
    S, P, E, S, P, E, S, H,
    S, S, S, S, S, S, S, S,
    S, S, S, S, S, S, S, S,
    S, S, S, P, S, S, S, H,
    P, S, S, S, S, S, S, P,
];
