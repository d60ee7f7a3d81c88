//! Clip captioning: backend trait, window planning, clip assembly, and the
//! captioning batch job.

pub mod backend;
pub mod backends;
pub mod clip;
pub mod job;
pub mod run;
pub mod window;

pub use backend::{CaptionBackend, CaptionRequest};
pub use clip::Clip;
pub use run::{CaptionRun, CaptionRunInfo};
pub use window::{Window, WindowParams, WindowPlan};

/// Default instruction sent with every clip.
///
/// The parts and component lists are the ground truth for the recorded
/// toy-car kit; captioning quality depends on the model matching against
/// exactly these names.
pub const ASSEMBLY_PROMPT: &str = "\
You are analyzing a video that shows the assembly of a toy car. Your task is to provide a structured textual analysis that includes:

1. Which components are already installed.
2. Do NOT count duplicate or unused parts in piles unless they are clearly part of an assembly.

Use the information below to match the parts/components accurately:

PARTS (individual items):
Red:
- 5x nut
- 1x front wing (2x3 T Shape with sloped front)
- 1x cap nut (Elongated rounded cap)
- 1x pulley
- 4x washer

Black:
- 4x wheel

Gray:
- 5x Pin
- 2x Axle

White:
- 1x 1x1x4 beam
- 4x 1x4 straight flat plate
- 2x 2x6 L-shape flat plate
- 1x 1x2x3 U-shape

COMPONENTS (individual parts or assembled from multiple parts):
- Base = 1x1x4 beam + pin
- Front chassis = 2x 1x4 straight flat plate
- Front chassis pin = pin + nut
- Rear chassis = 2x 2x6 L-shape flat plate
- Short rear chassis = 2x 1x4 straight flat plate
- Front rear chassis pin = pin + nut
- Rear rear chassis pin = pin + nut
- Front bracket: 1x2x3 U-Shape
- Front bracket screw: pin + cap nut
- Front wheel assembly: wing + axle + 2x washer + 2x wheel + nut
- Rear wheel assembly: pulley + axle + 2x washer + 2x wheel + nut

ASSEMBLY:
The final product is a toy car that includes the components listed above.

Please analyze the video and return:
- A list of **components or parts installed**
- Be concise, minimize unneeded text, but maximize information.
- Note that parts may be visible but not installed, do not count those.

The response must not exceed 350 tokens so be concise.
";
