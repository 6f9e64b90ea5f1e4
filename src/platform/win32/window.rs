// ── Main window ───────────────────────────────────────────────────────────────
//
// One top-level window per process.  It owns the `RenderHost` through its
// GWLP_USERDATA slot and forwards size, DPI and teardown messages to it.

#![allow(unsafe_code)]

use std::rc::Rc;

use windows::{
    core::{w, HSTRING, PCWSTR},
    Win32::{
        Foundation::{GetLastError, COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM},
        Graphics::Gdi::CreateSolidBrush,
        System::{
            Com::{CoInitializeEx, COINIT_APARTMENTTHREADED},
            LibraryLoader::GetModuleHandleW,
        },
        UI::WindowsAndMessaging::{
            CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW,
            GetWindowLongPtrW, LoadCursorW, LoadIconW, MessageBoxW, PostQuitMessage,
            RegisterClassExW, SetWindowLongPtrW, ShowWindow, TranslateMessage, UpdateWindow,
            CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, GWLP_USERDATA, HMENU, IDC_ARROW,
            IDI_APPLICATION, MB_ICONERROR, MB_OK, MSG, SW_SHOW, WINDOW_EX_STYLE, WM_CLOSE,
            WM_DESTROY, WM_DPICHANGED, WM_NCDESTROY, WM_SIZE, WNDCLASSEXW, WS_OVERLAPPEDWINDOW,
        },
    },
};

use super::{dpi, webview::RenderHost};
use crate::{
    error::{PreviewError, Result},
    platform::HostConfig,
    theme::Theme,
};

// ── Window identity ───────────────────────────────────────────────────────────

const CLASS_NAME: PCWSTR = w!("MonacoPreviewWindow");

/// Initial window size at 96 DPI.
const DEFAULT_WIDTH: i32 = 900;
const DEFAULT_HEIGHT: i32 = 700;

// ── Public API ────────────────────────────────────────────────────────────────

/// Create the main window, start the render host on it and drive the message
/// loop until the window closes.
pub(crate) fn run(config: HostConfig) -> Result<()> {
    #[cfg(debug_assertions)]
    let started = std::time::Instant::now();

    dpi::init();

    // SAFETY: first COM call on this thread.  WebView2 needs an STA on its UI
    // thread; the apartment lives until the process exits.
    unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }.ok()?;

    // SAFETY: a null module name yields this executable's handle.
    let hinstance = HINSTANCE(unsafe { GetModuleHandleW(None) }?.0);

    register_class(hinstance, config.theme)?;
    let hwnd = create_window(hinstance, &config.title)?;

    let host = RenderHost::new(hwnd, config.lockdown);
    attach_host(hwnd, Rc::clone(&host));

    // SAFETY: `hwnd` is the window created above.  Both return values report
    // previous state, not failure.
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOW);
        let _ = UpdateWindow(hwnd);
    }

    #[cfg(debug_assertions)]
    tracing::debug!(elapsed_ms = started.elapsed().as_secs_f64() * 1000.0, "window shown");

    if let Err(e) = host.present(config.html, config.install_dir, &config.user_data_dir) {
        // SAFETY: `hwnd` is still alive; nothing has destroyed it yet.
        unsafe {
            let _ = DestroyWindow(hwnd);
        }
        return Err(e);
    }

    message_loop()?;
    host.take_failure().map_or(Ok(()), Err)
}

/// Modal error box without an owner window.  Used by `main()` for fatal
/// errors.
pub(crate) fn show_error_dialog(message: &str) {
    let text = HSTRING::from(message);
    // SAFETY: `text` and the caption are valid wide strings for the call.
    unsafe {
        let _ = MessageBoxW(HWND::default(), &text, w!("Monaco Preview"), MB_OK | MB_ICONERROR);
    }
}

// ── Window class and creation ─────────────────────────────────────────────────

/// Window background behind the surface, as 0x00BBGGRR.  Matches the editor
/// theme so resizing never flashes the other colour.
fn background_colour(theme: Theme) -> COLORREF {
    match theme {
        Theme::Light => COLORREF(0x00FF_FFFF),
        Theme::Dark => COLORREF(0x001E_1E1E),
    }
}

fn register_class(hinstance: HINSTANCE, theme: Theme) -> Result<()> {
    // SAFETY: IDI_APPLICATION and IDC_ARROW name stock system resources; no
    // module handle is involved.
    let (icon, cursor) = unsafe { (LoadIconW(None, IDI_APPLICATION)?, LoadCursorW(None, IDC_ARROW)?) };

    // SAFETY: creates a GDI brush owned by the class for the process lifetime.
    let background = unsafe { CreateSolidBrush(background_colour(theme)) };

    let class = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wnd_proc),
        hInstance: hinstance,
        hIcon: icon,
        hIconSm: icon,
        hCursor: cursor,
        hbrBackground: background,
        lpszClassName: CLASS_NAME,
        ..Default::default()
    };

    // SAFETY: every handle in `class` is valid and CLASS_NAME is a static
    // wide string.
    if unsafe { RegisterClassExW(&class) } == 0 {
        return Err(last_error("RegisterClassExW"));
    }
    Ok(())
}

fn create_window(hinstance: HINSTANCE, title: &str) -> Result<HWND> {
    let (width, height) = dpi::initial_size(DEFAULT_WIDTH, DEFAULT_HEIGHT);
    let title = HSTRING::from(title);

    // SAFETY: the class is registered for `hinstance`; `title` outlives the
    // call.  Top-level window: no parent, no menu, no creation parameter.
    unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            CLASS_NAME,
            &title,
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            width,
            height,
            HWND::default(),
            HMENU::default(),
            hinstance,
            None,
        )
    }
    .map_err(|_| last_error("CreateWindowExW"))
}

// ── Host attachment ───────────────────────────────────────────────────────────

/// Store a strong reference to `host` in the window's user data slot.
/// Released in WM_NCDESTROY.
fn attach_host(hwnd: HWND, host: Rc<RenderHost>) {
    let ptr = Box::into_raw(Box::new(host));
    // SAFETY: hwnd is our live window; GWLP_USERDATA is reserved for the
    // application and holds nothing else.
    unsafe {
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, ptr as isize);
    }
}

/// The host attached to `hwnd`, if any.
fn host_of(hwnd: HWND) -> Option<Rc<RenderHost>> {
    // SAFETY: the slot holds either 0 or a pointer produced by `attach_host`
    // that stays valid until WM_NCDESTROY clears it.
    unsafe {
        let ptr = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *const Rc<RenderHost>;
        ptr.as_ref().map(Rc::clone)
    }
}

fn detach_host(hwnd: HWND) {
    // SAFETY: see `host_of`; the slot is cleared before the box is dropped so
    // no later message can observe a dangling pointer.
    unsafe {
        let ptr = SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) as *mut Rc<RenderHost>;
        if !ptr.is_null() {
            drop(Box::from_raw(ptr));
        }
    }
}

// ── Message loop ──────────────────────────────────────────────────────────────

/// Pump messages until WM_QUIT.  The engine's completion callbacks and events
/// are delivered from inside `DispatchMessageW`.
fn message_loop() -> Result<()> {
    let mut msg = MSG::default();
    loop {
        // SAFETY: `msg` is a valid out-pointer; a null window and a 0..0
        // filter take every message posted to this thread.
        match unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) }.0 {
            -1 => return Err(last_error("GetMessageW")),
            0 => return Ok(()),
            // SAFETY: `msg` was filled in by the successful call above.
            _ => unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            },
        }
    }
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: only ever called by the system for windows of CLASS_NAME, on the UI
// thread, with arguments valid for the duration of the call.
unsafe extern "system" fn wnd_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_SIZE => {
            if let Some(host) = host_of(hwnd) {
                host.resize();
            }
            LRESULT(0)
        }
        WM_DPICHANGED => {
            // The new rectangle produces a WM_SIZE, which refits the surface.
            dpi::apply_suggested_rect(hwnd, lparam);
            LRESULT(0)
        }
        WM_CLOSE => {
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }
        WM_DESTROY => {
            if let Some(host) = host_of(hwnd) {
                host.close();
            }
            PostQuitMessage(0);
            LRESULT(0)
        }
        WM_NCDESTROY => {
            detach_host(hwnd);
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

// ── Error helpers ─────────────────────────────────────────────────────────────

/// The calling thread's last Win32 error, attributed to `function`.  Read it
/// before making any other API call.
fn last_error(function: &'static str) -> PreviewError {
    // SAFETY: reads thread-local state; cannot fail.
    let code = unsafe { GetLastError() };
    PreviewError::Win32 {
        function,
        code: code.0,
    }
}
