use data::device::{Device, NewDevice};
use data::upgrade_event::NewUpgradeEvent;
use data::usage::UpgradeEventRequest;

/// LED count the firmware ships with before the user configures any hardware.
pub const DEFAULT_LED_COUNT: i32 = 30;

/// Whether a report looks like a freshly flashed device still running on
/// firmware defaults.
///
/// That is the case when no real previous version is reported (missing,
/// blank, or equal to the current version) and the LED count equals the
/// compiled-in default.
pub fn is_fresh_install(request: &UpgradeEventRequest, default_led_count: i32) -> bool {
    let no_previous_version = match request.previous_version.as_deref() {
        None => true,
        Some(previous) => previous.trim().is_empty() || previous == request.version,
    };
    no_previous_version && request.led_count == Some(default_led_count)
}

/// Outcome of applying one report to the stored state of a device.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Device state to write back.
    pub device: NewDevice,
    /// Transition to append; `None` for a device seen for the first time.
    pub upgrade_event: Option<NewUpgradeEvent>,
}

impl Reconciliation {
    pub fn is_new_device(&self) -> bool {
        self.upgrade_event.is_none()
    }
}

/// Merges a report into the stored device, if any.
///
/// A first report only creates the device. Later reports record the
/// transition from the stored version to the reported one (a check-in when
/// they are equal) and replace every reported attribute. LED count and matrix
/// flag are cleared for fresh installs since they only reflect defaults.
pub fn reconcile(
    existing: Option<&Device>,
    request: &UpgradeEventRequest,
    country_code: Option<String>,
    default_led_count: i32,
) -> Reconciliation {
    let fresh_install = is_fresh_install(request, default_led_count);
    let (led_count, is_matrix) = if fresh_install {
        (None, None)
    } else {
        (request.led_count, request.is_matrix)
    };

    let upgrade_event = existing.map(|device| NewUpgradeEvent {
        device_id: device.id.clone(),
        old_version: device.version.clone(),
        new_version: request.version.clone(),
    });

    let device = NewDevice {
        id: existing
            .map(|device| device.id.clone())
            .unwrap_or_else(|| request.device_id.clone()),
        version: request.version.clone(),
        release_name: request.release_name.clone(),
        chip: request.chip.clone(),
        led_count,
        is_matrix,
        bootloader_sha256: request.bootloader_sha256.clone(),
        brand: request.brand.clone(),
        product: request.product.clone(),
        flash_size: request.flash_size.clone(),
        partition_sizes: request.partition_sizes.clone(),
        psram_size: request.psram_size.clone(),
        psram_present: request.psram_present,
        country_code,
        repo: request.repo.clone(),
    };

    Reconciliation {
        device,
        upgrade_event,
    }
}
